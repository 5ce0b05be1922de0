//! Canned replies for non-command messages

use crate::config::BotConfig;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

const EMBEDDED: &str = include_str!("../../data/phrases.json");

/// Exact input text → reply text. Lookups are not normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhraseTable(HashMap<String, String>);

impl PhraseTable {
    /// Table compiled into the binary
    pub fn embedded() -> Result<Self> {
        Ok(serde_json::from_str(EMBEDDED)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// The configured file when there is one, else the embedded table
    pub fn load(config: &BotConfig) -> Result<Self> {
        let table = match &config.phrase_table_path {
            Some(path) => {
                tracing::info!("Loading phrase table from {}", path.display());
                Self::from_path(path)?
            }
            None => Self::embedded()?,
        };
        tracing::debug!("Phrase table has {} entries", table.len());
        Ok(table)
    }

    pub fn lookup(&self, text: &str) -> Option<&str> {
        self.0.get(text).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<const N: usize> From<[(&str, &str); N]> for PhraseTable {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(input, reply)| (input.to_string(), reply.to_string()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StockError;

    #[test]
    fn test_embedded_table_parses() {
        let table = PhraseTable::embedded().unwrap();
        assert!(!table.is_empty());
        assert!(table.lookup("hi").is_some());
    }

    #[test]
    fn test_lookup_is_exact() {
        let table = PhraseTable::from([("hello", "Hi there 👋")]);
        assert_eq!(table.lookup("hello"), Some("Hi there 👋"));
        assert_eq!(table.lookup("Hello"), None);
        assert_eq!(table.lookup(" hello"), None);
    }

    #[test]
    fn test_load_from_path() {
        let path = std::env::temp_dir().join(format!("phrases-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"ping": "pong"}"#).unwrap();

        let config = BotConfig::builder().phrase_table_path(&path).build().unwrap();
        let table = PhraseTable::load(&config).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup("ping"), Some("pong"));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_missing_file() {
        let result = PhraseTable::from_path("/nonexistent/phrases.json");
        assert!(matches!(result, Err(StockError::IoError(_))));
    }
}
