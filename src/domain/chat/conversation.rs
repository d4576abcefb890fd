//! Conversation - the ordered, append-only message log of one session.

use thiserror::Error;

use super::message::Message;
use crate::domain::foundation::ValidationError;

/// Errors raised when an append would break the conversation's shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversationError {
    #[error("invalid user message: {0}")]
    InvalidMessage(#[from] ValidationError),

    #[error("previous user message has not been answered yet")]
    ReplyPending,

    #[error("no user message is waiting for a reply")]
    NothingToAnswer,
}

/// Ordered sequence of messages for a single session.
///
/// Messages are never reordered, edited, or removed. A user message must be
/// answered by exactly one assistant message before the next user message.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
    awaiting_reply: bool,
}

impl Conversation {
    /// Creates an empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a user message and marks the conversation as awaiting a reply.
    pub fn append_user(&mut self, content: impl Into<String>) -> Result<&Message, ConversationError> {
        if self.awaiting_reply {
            return Err(ConversationError::ReplyPending);
        }
        let message = Message::user(content)?;
        self.awaiting_reply = true;
        Ok(self.push(message))
    }

    /// Appends the single assistant-role answer to the pending user message.
    pub fn append_reply(&mut self, content: impl Into<String>) -> Result<&Message, ConversationError> {
        if !self.awaiting_reply {
            return Err(ConversationError::NothingToAnswer);
        }
        self.awaiting_reply = false;
        Ok(self.push(Message::assistant(content)))
    }

    fn push(&mut self, message: Message) -> &Message {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    /// Returns all messages in insertion order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
