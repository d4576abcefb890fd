//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports:
//! the relay turns one request into one upstream call, and the conversation
//! controller drives a session's turns through a relay client.

pub mod handlers;

pub use handlers::chat::{ChatSnapshot, ConversationController, IgnoredReason, SubmitOutcome};
pub use handlers::relay::{
    RelayError, RelayMessageCommand, RelayMessageHandler, RelayMessageResult, RelaySettings,
};
