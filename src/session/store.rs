//! Append-only conversation history.

use super::message::Message;

/// Greeting shown before the user has said anything.
pub const DEFAULT_GREETING: &str = "¡Hola! ¿En qué puedo ayudarte hoy?";

/// Ordered list of messages. Display order is append order.
///
/// Messages are never edited or removed once appended.
#[derive(Debug, Clone)]
pub struct ConversationStore {
    messages: Vec<Message>,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::with_greeting(DEFAULT_GREETING)
    }
}

impl ConversationStore {
    /// Create a store seeded with a single assistant greeting.
    #[must_use]
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::assistant(greeting)],
        }
    }

    pub(crate) fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// All messages in display order.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Get the number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always false after construction; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Most recent message.
    #[must_use]
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}
