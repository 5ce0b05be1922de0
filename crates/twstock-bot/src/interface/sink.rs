//! Transport seam for outgoing messages
//!
//! The dispatcher only produces an ordered list of [`TextMessage`]s; a sink
//! delivers them. Delivery is in order with no atomicity across the list.

use crate::error::Result;
use crate::interface::TextMessage;
use async_trait::async_trait;
use tokio::sync::Mutex;

/// Anything that can deliver replies to the user
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn send(&self, messages: &[TextMessage]) -> Result<()>;
}

/// Sink that keeps everything it was given, in order
#[derive(Debug, Default)]
pub struct MemorySink {
    sent: Mutex<Vec<TextMessage>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<TextMessage> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl MessageSink for MemorySink {
    async fn send(&self, messages: &[TextMessage]) -> Result<()> {
        self.sent.lock().await.extend_from_slice(messages);
        Ok(())
    }
}
