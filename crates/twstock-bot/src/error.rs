//! Error types for stock bot operations

use thiserror::Error;

/// Stock bot specific errors
#[derive(Debug, Error)]
pub enum StockError {
    /// Malformed equity identifier
    #[error("Invalid stock number: {0}")]
    InvalidSymbol(String),

    /// Malformed or impossible calendar date
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Other input that failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Field name outside the known vocabulary
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Known field that the stock has no data for
    #[error("No such field: {0}")]
    FieldNotFound(String),

    /// A command indexed a positional token the user did not supply
    #[error("Missing argument #{position} ({name})")]
    MissingArgument {
        position: usize,
        name: &'static str,
    },

    /// Upstream data source failure
    #[error("Provider error: {0}")]
    Provider(String),

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// File system error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl StockError {
    /// True when the user can fix the failure by correcting their input
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidSymbol(_)
                | Self::InvalidDate(_)
                | Self::Validation(_)
                | Self::UnknownField(_)
                | Self::FieldNotFound(_)
                | Self::MissingArgument { .. }
        )
    }
}

/// Result type alias for stock operations
pub type Result<T> = std::result::Result<T, StockError>;
