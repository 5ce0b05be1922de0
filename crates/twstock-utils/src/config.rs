//! Process-level configuration

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Application name
    pub app_name: String,
    /// Environment (development, production, ...)
    pub environment: String,
    /// Default tracing filter, used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "twstock-bot".to_string(),
            environment: "development".to_string(),
            log_filter: "warn,twstock_bot=info".to_string(),
        }
    }
}

impl Config {
    /// Build from `STOCK_BOT_ENV` and `STOCK_BOT_LOG`, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            environment: std::env::var("STOCK_BOT_ENV").unwrap_or(defaults.environment),
            log_filter: std::env::var("STOCK_BOT_LOG").unwrap_or(defaults.log_filter),
            ..defaults
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.app_name, "twstock-bot");
        assert!(!config.is_production());
        assert!(config.log_filter.contains("twstock_bot"));
    }

    #[test]
    fn test_production_flag_is_case_insensitive() {
        let config = Config {
            environment: "Production".to_string(),
            ..Config::default()
        };
        assert!(config.is_production());
    }
}
