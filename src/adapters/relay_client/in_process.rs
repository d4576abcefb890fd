//! In-process relay client - calls the relay handler without a network hop.
//!
//! Failures are reshaped into the same HTTP-style outcome the endpoint would
//! produce, so the controller cannot tell the two clients apart.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::{RelayMessageCommand, RelayMessageHandler};
use crate::domain::chat::TurnFailure;
use crate::ports::{RelayClient, RelayReply};

pub struct InProcessRelayClient {
    handler: Arc<RelayMessageHandler>,
}

impl InProcessRelayClient {
    pub fn new(handler: Arc<RelayMessageHandler>) -> Self {
        Self { handler }
    }
}

#[async_trait]
impl RelayClient for InProcessRelayClient {
    async fn send(&self, message: &str) -> Result<RelayReply, TurnFailure> {
        self.handler
            .handle(RelayMessageCommand::new(message))
            .await
            .map(|result| RelayReply::new(result.message))
            .map_err(|err| TurnFailure::http(err.status_code(), Some(err.to_string())))
    }
}
