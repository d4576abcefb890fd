//! Chat domain - messages, the append-only conversation, and turn lifecycle.
//!
//! A conversation is owned by exactly one session. Every user message is
//! answered by exactly one assistant-role message: either the relayed reply
//! or a synthesized explanation of why the turn failed.

mod conversation;
mod failure;
mod message;
mod turn;

pub use conversation::{Conversation, ConversationError};
pub use failure::{
    HttpStatusClass, TransportFailure, TurnFailure, EMPTY_REPLY_PLACEHOLDER,
    MISSING_CREDENTIAL_PHRASE,
};
pub use message::{Message, MessageId, Role};
pub use turn::TurnState;
