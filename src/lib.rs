//! PitCoach - conversational fitness coaching relay
//!
//! This crate relays a user's chat message to an upstream chat-completion
//! model under the "PitCoach Mint" coaching persona, and drives a single
//! session's conversation on the client side.
//!
//! - `domain` - conversation, turn lifecycle, failure classification, model card
//! - `ports` - upstream AI provider and relay client contracts
//! - `application` - relay handler and conversation controller
//! - `adapters` - OpenAI, HTTP server, relay clients, terminal front-end
//! - `config` - environment-driven configuration

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
