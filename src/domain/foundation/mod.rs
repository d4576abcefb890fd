//! Foundation module - Shared domain primitives.
//!
//! Contains the value objects, traits, and error types that the
//! chat domain is built from.

mod errors;
mod state_machine;
mod timestamp;

pub use errors::ValidationError;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
