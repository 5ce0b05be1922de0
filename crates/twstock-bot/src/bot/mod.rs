//! Chat command bot
//!
//! Turns one incoming text message into an ordered list of reply messages.
//!
//! # Example
//!
//! ```rust,ignore
//! use twstock_bot::bot::StockBot;
//! use twstock_bot::config::BotConfig;
//! use twstock_bot::platforms::StdoutSink;
//! use twstock_bot::provider::TwseProvider;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = BotConfig::from_env()?;
//!     let provider = Arc::new(TwseProvider::new(&config)?);
//!     let bot = StockBot::new(&config, provider)?;
//!     bot.process("/price 2330", &StdoutSink::new()).await?;
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod dispatcher;
pub mod format;
pub mod handlers;
pub mod phrases;

use crate::config::BotConfig;
use crate::error::Result;
use crate::interface::{MessageSink, TextMessage};
use crate::provider::StockProvider;
use std::sync::Arc;

pub use commands::{CommandArgs, CommandEntry, CommandHandler, CommandRegistry};
pub use dispatcher::Dispatcher;
pub use handlers::default_registry;
pub use phrases::PhraseTable;

/// Built-in commands plus the phrase table behind one dispatcher
#[derive(Debug, Clone)]
pub struct StockBot {
    dispatcher: Dispatcher,
}

impl StockBot {
    /// Build the bot with the built-in commands and the configured phrase table
    pub fn new(config: &BotConfig, provider: Arc<dyn StockProvider>) -> Result<Self> {
        let phrases = PhraseTable::load(config)?;
        Ok(Self::with_phrases(config, provider, phrases))
    }

    pub fn with_phrases(
        config: &BotConfig,
        provider: Arc<dyn StockProvider>,
        phrases: PhraseTable,
    ) -> Self {
        let registry = default_registry(config, provider);
        tracing::debug!("Registered {} commands", registry.len());

        Self {
            dispatcher: Dispatcher::new(Arc::new(registry), Arc::new(phrases), config.max_replies),
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub async fn respond(&self, text: &str) -> Vec<TextMessage> {
        self.dispatcher.dispatch(text).await
    }

    /// Respond to `text` and hand the replies to `sink`; returns how many were sent
    pub async fn process(&self, text: &str, sink: &dyn MessageSink) -> Result<usize> {
        let replies = self.respond(text).await;
        sink.send(&replies).await?;
        Ok(replies.len())
    }
}
