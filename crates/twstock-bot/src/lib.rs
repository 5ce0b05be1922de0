//! Taiwan stock chat bot
//!
//! Answers chat-style text commands about one listed equity at a time:
//!
//! - Real-time quotes and names from the exchange's quote service
//! - Daily trading data for a date range, grouped into messages
//! - Closing price trends per day or per month, and K-line candles
//! - Canned replies for non-command messages from a phrase table
//!
//! # Architecture
//!
//! A [`StockProvider`] fetches raw data, a [`Stock`] is built from it for
//! exactly one query, and the [`bot::Dispatcher`] turns handler output (or
//! handler failure) into reply text for a [`interface::MessageSink`].
//!
//! # Example
//!
//! ```rust,ignore
//! use twstock_bot::{BotConfig, StockBot, TwseProvider};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = BotConfig::default();
//!     let bot = StockBot::new(&config, Arc::new(TwseProvider::new(&config)?))?;
//!
//!     for reply in bot.respond("/daily 2330 20250101 20250110").await {
//!         println!("{reply}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod bot;
pub mod config;
pub mod date_util;
pub mod error;
pub mod interface;
pub mod platforms;
pub mod provider;
pub mod stock;

pub use bot::StockBot;
pub use config::BotConfig;
pub use date_util::DateRange;
pub use error::{Result, StockError};
pub use provider::{FetchRequest, Snapshot, StockProvider, TwseProvider};
pub use stock::{Field, Interval, Stock};
