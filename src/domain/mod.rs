//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (timestamps, validation errors, state machines)
//! - `chat` - Conversation, turn lifecycle and failure classification
//! - `model_card` - Static agent descriptor

pub mod chat;
pub mod foundation;
pub mod model_card;
