//! Application handlers.
//!
//! Command handlers that orchestrate domain operations over ports.

pub mod chat;
pub mod relay;
