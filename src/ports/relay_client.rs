//! Relay Client Port - how a conversation reaches the relay service.
//!
//! The conversation controller awaits exactly one outcome per call: a reply,
//! an HTTP-shaped failure, or a transport failure. Implementations exist for
//! the HTTP endpoint and for calling the relay in-process.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::chat::TurnFailure;

/// Successful relay payload.
///
/// `message` may be absent; the controller substitutes a placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayReply {
    #[serde(default)]
    pub message: Option<String>,
}

impl RelayReply {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// A reply that carried no text.
    pub fn empty() -> Self {
        Self { message: None }
    }
}

/// Port for sending one user message to the relay.
#[async_trait]
pub trait RelayClient: Send + Sync {
    /// Sends `message` and waits for its single outcome.
    async fn send(&self, message: &str) -> Result<RelayReply, TurnFailure>;
}
