//! Routes one incoming message to a reply

use super::commands::{CommandArgs, CommandEntry, CommandRegistry};
use super::phrases::PhraseTable;
use crate::error::StockError;
use crate::interface::TextMessage;
use std::sync::Arc;

/// Stateless message router.
///
/// Every failure is turned into reply text here; [`Dispatcher::dispatch`]
/// never fails.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<CommandRegistry>,
    phrases: Arc<PhraseTable>,
    max_replies: usize,
}

impl Dispatcher {
    pub fn new(registry: Arc<CommandRegistry>, phrases: Arc<PhraseTable>, max_replies: usize) -> Self {
        Self {
            registry,
            phrases,
            max_replies,
        }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub async fn dispatch(&self, text: &str) -> Vec<TextMessage> {
        let args = CommandArgs::parse(text);
        let Some(token) = args.command() else {
            tracing::debug!("Blank message");
            return apology();
        };

        if token == "/" {
            return vec![TextMessage::new(
                "🤌 No space between \"/\" and the command, please.\nTry /help to see what I can do.",
            )];
        }

        match self.registry.get(token) {
            Some(entry) => self.run(entry, text).await,
            None => self.fallback(text),
        }
    }

    async fn run(&self, entry: &CommandEntry, text: &str) -> Vec<TextMessage> {
        tracing::info!("Command {}: {:?}", entry.token, text);

        match entry.handler.handle(text).await {
            Ok(replies) if replies.len() > self.max_replies => {
                tracing::info!(
                    "{} produced {} replies, limit is {}",
                    entry.token,
                    replies.len(),
                    self.max_replies
                );
                too_many_replies()
            }
            Ok(replies) => replies,
            Err(StockError::MissingArgument { position, name }) => {
                tracing::debug!("{} missing argument #{} ({})", entry.token, position, name);
                vec![TextMessage::new(format!(
                    "❌ Insufficient arguments\n📖 Description: {}\n💡 Usage: {}",
                    entry.description, entry.usage
                ))]
            }
            Err(e) => {
                if e.is_user_error() {
                    tracing::debug!("{} rejected input: {}", entry.token, e);
                } else {
                    tracing::warn!("{} failed: {}", entry.token, e);
                }
                vec![TextMessage::new(format!(
                    "❌ An error occurred: {e}\n📖 Command: {}",
                    entry.description
                ))]
            }
        }
    }

    fn fallback(&self, text: &str) -> Vec<TextMessage> {
        match self.phrases.lookup(text) {
            Some(reply) => vec![TextMessage::new(reply)],
            None => vec![TextMessage::new(
                "Unrecognized message ❓\nType /help to see the available commands.",
            )],
        }
    }
}

fn apology() -> Vec<TextMessage> {
    vec![
        TextMessage::new("😥 Sorry, I could not understand that message."),
        TextMessage::new("Type /help to see the available commands."),
    ]
}

fn too_many_replies() -> Vec<TextMessage> {
    vec![
        TextMessage::new("⚠️ Too many replies for one message."),
        TextMessage::new("Please narrow your query, for example with a shorter date range."),
    ]
}
