//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to external systems:
//! - `ai` - Upstream chat-completion providers (OpenAI, mock)
//! - `http` - axum server exposing the relay and model card
//! - `relay_client` - Ways for a conversation to reach the relay
//! - `terminal` - Line-oriented chat front-end

pub mod ai;
pub mod http;
pub mod relay_client;
pub mod terminal;
