//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the application and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - Upstream chat-completion model
//! - `RelayClient` - How a conversation reaches the relay

mod ai_provider;
mod relay_client;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, Message, MessageRole, TokenUsage,
};
pub use relay_client::{RelayClient, RelayReply};
