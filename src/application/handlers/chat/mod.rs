//! Chat handlers - session-scoped conversation control.

mod conversation_controller;

pub use conversation_controller::{
    ChatSnapshot, ConversationController, IgnoredReason, SubmitOutcome,
};
