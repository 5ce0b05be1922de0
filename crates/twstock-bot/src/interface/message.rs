//! Message types for bot replies

use serde::{Deserialize, Serialize};
use std::fmt;

/// One self-contained plain-text reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextMessage {
    pub text: String,
}

impl TextMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.text.contains(needle)
    }
}

impl From<String> for TextMessage {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for TextMessage {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl fmt::Display for TextMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
