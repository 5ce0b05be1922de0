//! Configuration for the stock bot

use crate::error::{Result, StockError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for dispatching and data fetching
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Most text messages a single reply may contain
    pub max_replies: usize,

    /// Daily records grouped into one message by `/daily`
    pub daily_batch_size: usize,

    /// Series rows grouped into one message by `/pricetrend` and `/kline`
    pub series_rows_per_message: usize,

    /// Widest date range a command may ask for, in calendar months
    pub max_range_months: usize,

    /// Phrase table JSON file; the embedded table is used when unset
    pub phrase_table_path: Option<PathBuf>,

    /// HTTP request timeout
    pub request_timeout: Duration,

    /// Requests allowed per five-second window against the exchange
    pub rate_limit_per_5s: u32,

    /// Base URL of the exchange report endpoints
    pub twse_base_url: String,

    /// Base URL of the real-time quote endpoint
    pub mis_base_url: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            max_replies: 5,
            daily_batch_size: 5,
            series_rows_per_message: 20,
            max_range_months: 12,
            phrase_table_path: None,
            request_timeout: Duration::from_secs(10),
            rate_limit_per_5s: 3,
            twse_base_url: "https://www.twse.com.tw".to_string(),
            mis_base_url: "https://mis.twse.com.tw".to_string(),
        }
    }
}

impl BotConfig {
    /// Create a new configuration builder
    pub fn builder() -> BotConfigBuilder {
        BotConfigBuilder::default()
    }

    /// Create config from `STOCK_BOT_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::builder().with_env().build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_replies == 0 {
            return Err(StockError::ConfigError(
                "max_replies must be greater than 0".to_string(),
            ));
        }

        if self.daily_batch_size == 0 || self.series_rows_per_message == 0 {
            return Err(StockError::ConfigError(
                "message batch sizes must be greater than 0".to_string(),
            ));
        }

        if self.max_range_months == 0 {
            return Err(StockError::ConfigError(
                "max_range_months must be greater than 0".to_string(),
            ));
        }

        if self.rate_limit_per_5s == 0 {
            return Err(StockError::ConfigError(
                "rate_limit_per_5s must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for BotConfig
#[derive(Debug, Default)]
pub struct BotConfigBuilder {
    max_replies: Option<usize>,
    daily_batch_size: Option<usize>,
    series_rows_per_message: Option<usize>,
    max_range_months: Option<usize>,
    phrase_table_path: Option<PathBuf>,
    request_timeout: Option<Duration>,
    rate_limit_per_5s: Option<u32>,
    twse_base_url: Option<String>,
    mis_base_url: Option<String>,
}

impl BotConfigBuilder {
    pub fn max_replies(mut self, max: usize) -> Self {
        self.max_replies = Some(max);
        self
    }

    pub fn daily_batch_size(mut self, size: usize) -> Self {
        self.daily_batch_size = Some(size);
        self
    }

    pub fn series_rows_per_message(mut self, rows: usize) -> Self {
        self.series_rows_per_message = Some(rows);
        self
    }

    pub fn max_range_months(mut self, months: usize) -> Self {
        self.max_range_months = Some(months);
        self
    }

    pub fn phrase_table_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.phrase_table_path = Some(path.into());
        self
    }

    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    pub fn rate_limit_per_5s(mut self, limit: u32) -> Self {
        self.rate_limit_per_5s = Some(limit);
        self
    }

    pub fn twse_base_url(mut self, url: impl Into<String>) -> Self {
        self.twse_base_url = Some(url.into());
        self
    }

    pub fn mis_base_url(mut self, url: impl Into<String>) -> Self {
        self.mis_base_url = Some(url.into());
        self
    }

    /// Fill unset values from the environment.
    ///
    /// Unparsable numbers are ignored with a warning rather than failing.
    pub fn with_env(mut self) -> Self {
        if self.max_replies.is_none() {
            self.max_replies = env_parse("STOCK_BOT_MAX_REPLIES");
        }
        if self.max_range_months.is_none() {
            self.max_range_months = env_parse("STOCK_BOT_MAX_RANGE_MONTHS");
        }
        if self.request_timeout.is_none() {
            self.request_timeout = env_parse("STOCK_BOT_TIMEOUT_SECS").map(Duration::from_secs);
        }
        if self.rate_limit_per_5s.is_none() {
            self.rate_limit_per_5s = env_parse("STOCK_BOT_RATE_LIMIT");
        }
        if self.phrase_table_path.is_none() {
            self.phrase_table_path = std::env::var("STOCK_BOT_PHRASES").ok().map(PathBuf::from);
        }
        if self.twse_base_url.is_none() {
            self.twse_base_url = std::env::var("STOCK_BOT_TWSE_URL").ok();
        }
        if self.mis_base_url.is_none() {
            self.mis_base_url = std::env::var("STOCK_BOT_MIS_URL").ok();
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<BotConfig> {
        let defaults = BotConfig::default();

        let config = BotConfig {
            max_replies: self.max_replies.unwrap_or(defaults.max_replies),
            daily_batch_size: self.daily_batch_size.unwrap_or(defaults.daily_batch_size),
            series_rows_per_message: self
                .series_rows_per_message
                .unwrap_or(defaults.series_rows_per_message),
            max_range_months: self.max_range_months.unwrap_or(defaults.max_range_months),
            phrase_table_path: self.phrase_table_path,
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            rate_limit_per_5s: self.rate_limit_per_5s.unwrap_or(defaults.rate_limit_per_5s),
            twse_base_url: self.twse_base_url.unwrap_or(defaults.twse_base_url),
            mis_base_url: self.mis_base_url.unwrap_or(defaults.mis_base_url),
        };

        config.validate()?;
        Ok(config)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    let parsed = raw.trim().parse().ok();
    if parsed.is_none() {
        tracing::warn!("Ignoring {}={:?}: not a valid number", key, raw);
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BotConfig::default();
        assert_eq!(config.max_replies, 5);
        assert_eq!(config.daily_batch_size, 5);
        assert!(config.phrase_table_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = BotConfig::builder()
            .max_replies(3)
            .daily_batch_size(2)
            .request_timeout(Duration::from_secs(30))
            .phrase_table_path("phrases.json")
            .build()
            .unwrap();

        assert_eq!(config.max_replies, 3);
        assert_eq!(config.daily_batch_size, 2);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.phrase_table_path, Some(PathBuf::from("phrases.json")));
        assert_eq!(config.series_rows_per_message, 20);
        assert_eq!(config.max_range_months, 12);
    }

    #[test]
    fn test_validation_rejects_zero_limits() {
        assert!(BotConfig::builder().max_replies(0).build().is_err());
        assert!(BotConfig::builder().daily_batch_size(0).build().is_err());
        assert!(BotConfig::builder().rate_limit_per_5s(0).build().is_err());
        assert!(BotConfig::builder().max_range_months(0).build().is_err());
    }

    #[test]
    fn test_explicit_values_win_over_env() {
        // explicit builder values are never overwritten by with_env
        let config = BotConfig::builder()
            .max_replies(7)
            .twse_base_url("http://localhost:9000")
            .with_env()
            .build()
            .unwrap();
        assert_eq!(config.max_replies, 7);
        assert_eq!(config.twse_base_url, "http://localhost:9000");
    }
}
