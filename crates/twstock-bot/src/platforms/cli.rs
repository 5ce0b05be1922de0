//! Terminal transport: replies are printed to stdout

use crate::error::Result;
use crate::interface::{MessageSink, TextMessage};
use async_trait::async_trait;
use std::io::Write;

/// Prints each message followed by a blank line
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl StdoutSink {
    pub fn new() -> Self {
        Self
    }

    /// Write messages to any writer, flushing once at the end
    pub fn write_to(writer: &mut impl Write, messages: &[TextMessage]) -> Result<()> {
        for message in messages {
            writeln!(writer, "{}\n", message.text.trim_end())?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[async_trait]
impl MessageSink for StdoutSink {
    async fn send(&self, messages: &[TextMessage]) -> Result<()> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        Self::write_to(&mut handle, messages)
    }
}
