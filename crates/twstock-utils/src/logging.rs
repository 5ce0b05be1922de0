//! Logging and tracing utilities

use crate::config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Output format of the fmt layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines
    Pretty,
    /// One JSON object per event, for log collectors
    Json,
}

impl LogFormat {
    /// JSON in production, plain text everywhere else
    pub fn for_config(config: &Config) -> Self {
        if config.is_production() {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins over `config.log_filter` when it is set. Calling this twice
/// is harmless; the second subscriber is silently discarded.
pub fn init_tracing(config: &Config) {
    let format = LogFormat::for_config(config);
    let _ = tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with((format == LogFormat::Pretty).then(|| fmt::layer().with_target(false)))
        .with((format == LogFormat::Json).then(|| fmt::layer().json()))
        .try_init();
}
