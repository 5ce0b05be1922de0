//! Command registry and argument extraction
//!
//! Commands are registered once at startup and never change afterwards. Each
//! entry pairs a handler with the description and usage line shown to users
//! when they get a command wrong.

use crate::bot::handlers::HelpHandler;
use crate::date_util::DateRange;
use crate::error::{Result, StockError};
use crate::interface::TextMessage;
use async_trait::async_trait;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

static STOCK_NO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z]{4,6}$").expect("stock number pattern is valid"));

/// Turns the full text of one message into reply fragments.
///
/// Handlers report missing positional tokens as
/// [`StockError::MissingArgument`] (see [`CommandArgs`]); every other error is
/// treated as a runtime failure by the dispatcher.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, text: &str) -> Result<Vec<TextMessage>>;
}

/// A registered command
#[derive(Clone)]
pub struct CommandEntry {
    pub token: String,
    pub description: String,
    pub usage: String,
    pub handler: Arc<dyn CommandHandler>,
}

impl fmt::Debug for CommandEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandEntry")
            .field("token", &self.token)
            .field("description", &self.description)
            .field("usage", &self.usage)
            .finish_non_exhaustive()
    }
}

/// Read-only lookup from command token to entry
#[derive(Debug, Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
    index: HashMap<String, usize>,
}

impl CommandRegistry {
    pub fn builder() -> CommandRegistryBuilder {
        CommandRegistryBuilder::default()
    }

    /// Case-insensitive lookup
    pub fn get(&self, token: &str) -> Option<&CommandEntry> {
        self.index
            .get(&token.to_lowercase())
            .map(|&idx| &self.entries[idx])
    }

    /// Entries in registration order, `/help` first
    pub fn entries(&self) -> &[CommandEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Collects commands, then freezes them into a [`CommandRegistry`]
#[derive(Default)]
pub struct CommandRegistryBuilder {
    entries: Vec<CommandEntry>,
}

impl CommandRegistryBuilder {
    /// Register a command; re-registering a token replaces the earlier entry
    pub fn register(
        mut self,
        token: &str,
        description: impl Into<String>,
        usage: impl Into<String>,
        handler: impl CommandHandler + 'static,
    ) -> Self {
        let token = token.to_lowercase();
        self.entries.retain(|entry| entry.token != token);
        self.entries.push(CommandEntry {
            token,
            description: description.into(),
            usage: usage.into(),
            handler: Arc::new(handler),
        });
        self
    }

    /// Freeze the registry, adding a `/help` command that lists the others
    pub fn build(self) -> CommandRegistry {
        let mut entries = Vec::with_capacity(self.entries.len() + 1);
        entries.push(CommandEntry {
            token: "/help".to_string(),
            description: "Show all commands".to_string(),
            usage: "/help".to_string(),
            handler: Arc::new(HelpHandler::new(&self.entries)),
        });
        entries.extend(self.entries.into_iter().filter(|entry| entry.token != "/help"));

        let index = entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| (entry.token.clone(), idx))
            .collect();

        CommandRegistry { entries, index }
    }
}

/// Whitespace-split view of a command message.
///
/// Position 0 is the command token itself.
#[derive(Debug, Clone)]
pub struct CommandArgs<'a> {
    tokens: Vec<&'a str>,
}

impl<'a> CommandArgs<'a> {
    pub fn parse(text: &'a str) -> Self {
        Self {
            tokens: text.split_whitespace().collect(),
        }
    }

    pub fn command(&self) -> Option<&'a str> {
        self.tokens.first().copied()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn optional(&self, position: usize) -> Option<&'a str> {
        self.tokens.get(position).copied()
    }

    pub fn required(&self, position: usize, name: &'static str) -> Result<&'a str> {
        self.optional(position)
            .ok_or(StockError::MissingArgument { position, name })
    }

    /// Required stock number: 4 to 6 ASCII letters or digits
    pub fn stock_no(&self, position: usize) -> Result<&'a str> {
        let stock_no = self.required(position, "stock no")?;
        if !STOCK_NO.is_match(stock_no) {
            return Err(StockError::InvalidSymbol(stock_no.to_string()));
        }
        Ok(stock_no)
    }

    /// Optional `<start> <end>` pair starting at `position`.
    ///
    /// Without a start date the range is the current month to date. A start
    /// date without an end date is a missing argument.
    pub fn date_range(&self, position: usize) -> Result<DateRange> {
        match self.optional(position) {
            None => Ok(DateRange::month_to_date()),
            Some(start) => {
                let end = self.required(position + 1, "end date")?;
                DateRange::new(start, end)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo(&'static str);

    #[async_trait]
    impl CommandHandler for Echo {
        async fn handle(&self, _text: &str) -> Result<Vec<TextMessage>> {
            Ok(vec![TextMessage::new(self.0)])
        }
    }

    #[test]
    fn test_registry_lookup_is_case_insensitive() {
        let registry = CommandRegistry::builder()
            .register("/Test", "Test command", "/test", Echo("ok"))
            .build();

        assert!(registry.get("/test").is_some());
        assert!(registry.get("/TEST").is_some());
        assert!(registry.get("/unknown").is_none());
        assert_eq!(registry.get("/test").unwrap().description, "Test command");
    }

    #[test]
    fn test_registry_adds_help_first() {
        let registry = CommandRegistry::builder()
            .register("/a", "A", "/a", Echo("a"))
            .register("/b", "B", "/b", Echo("b"))
            .build();

        let tokens: Vec<_> = registry.entries().iter().map(|e| e.token.as_str()).collect();
        assert_eq!(tokens, vec!["/help", "/a", "/b"]);
        assert_eq!(registry.len(), 3);
    }

    #[tokio::test]
    async fn test_register_replaces_duplicate_token() {
        let registry = CommandRegistry::builder()
            .register("/a", "first", "/a", Echo("first"))
            .register("/A", "second", "/a", Echo("second"))
            .build();

        assert_eq!(registry.len(), 2);
        let entry = registry.get("/a").unwrap();
        assert_eq!(entry.description, "second");
        let reply = entry.handler.handle("/a").await.unwrap();
        assert_eq!(reply[0].text, "second");
    }

    #[test]
    fn test_args_positions() {
        let args = CommandArgs::parse("  /daily   2330 20250101\t20250105 ");
        assert_eq!(args.command(), Some("/daily"));
        assert_eq!(args.len(), 4);
        assert_eq!(args.required(1, "stock no").unwrap(), "2330");
        assert_eq!(args.optional(4), None);
        assert!(CommandArgs::parse("   ").is_empty());
    }

    #[test]
    fn test_required_reports_position() {
        let args = CommandArgs::parse("/name");
        match args.required(1, "stock no") {
            Err(StockError::MissingArgument { position, name }) => {
                assert_eq!(position, 1);
                assert_eq!(name, "stock no");
            }
            other => panic!("expected MissingArgument, got {other:?}"),
        }
    }

    #[test]
    fn test_stock_no_validation() {
        assert_eq!(CommandArgs::parse("/name 2330").stock_no(1).unwrap(), "2330");
        assert_eq!(CommandArgs::parse("/name 00878").stock_no(1).unwrap(), "00878");
        assert!(matches!(
            CommandArgs::parse("/name 23;0").stock_no(1),
            Err(StockError::InvalidSymbol(_))
        ));
        assert!(matches!(
            CommandArgs::parse("/name").stock_no(1),
            Err(StockError::MissingArgument { .. })
        ));
    }

    #[test]
    fn test_date_range_arguments() {
        let range = CommandArgs::parse("/daily 2330 20250101 20250105")
            .date_range(2)
            .unwrap();
        assert_eq!(range.start(), "20250101");
        assert_eq!(range.end(), "20250105");

        assert!(matches!(
            CommandArgs::parse("/daily 2330 20250101").date_range(2),
            Err(StockError::MissingArgument { position: 3, .. })
        ));
        assert!(matches!(
            CommandArgs::parse("/daily 2330 2025-01-01 20250105").date_range(2),
            Err(StockError::InvalidDate(_))
        ));

        let default = CommandArgs::parse("/daily 2330").date_range(2).unwrap();
        assert!(default.start().ends_with("01"));
    }
}
