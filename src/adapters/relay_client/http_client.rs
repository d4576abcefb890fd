//! HTTP relay client - reaches the relay endpoint with reqwest.
//!
//! One POST per turn, no retry, no timeout beyond the transport default.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::domain::chat::{TransportFailure, TurnFailure};
use crate::ports::{RelayClient, RelayReply};

#[derive(Debug, Serialize)]
struct RelayRequestBody<'a> {
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct RelayErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Relay client speaking to `POST {base_url}/api/agent`.
#[derive(Debug, Clone)]
pub struct HttpRelayClient {
    client: Client,
    endpoint: String,
}

impl HttpRelayClient {
    /// Creates a client for the relay served at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, TransportFailure> {
        let client = Client::builder()
            .build()
            .map_err(|e| TransportFailure::Other(Some(format!("HTTP client setup failed: {e}"))))?;

        Ok(Self {
            client,
            endpoint: format!("{}/api/agent", base_url.trim_end_matches('/')),
        })
    }

    /// Full URL of the relay endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn decode_failure(status: StatusCode, body: &[u8]) -> TurnFailure {
        // A non-JSON error body still yields an HTTP failure, just without detail.
        let detail = serde_json::from_slice::<RelayErrorBody>(body)
            .ok()
            .and_then(|b| b.error);
        TurnFailure::http(status.as_u16(), detail)
    }
}

fn classify(err: reqwest::Error) -> TransportFailure {
    if err.is_connect() || err.is_timeout() || err.is_request() {
        TransportFailure::Connectivity(err.to_string())
    } else if err.is_decode() || err.is_body() {
        TransportFailure::MalformedResponse(err.to_string())
    } else {
        TransportFailure::Other(Some(err.to_string()))
    }
}

#[async_trait]
impl RelayClient for HttpRelayClient {
    async fn send(&self, message: &str) -> Result<RelayReply, TurnFailure> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&RelayRequestBody { message })
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        let body = response.bytes().await.map_err(classify)?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "relay returned failure status");
            return Err(Self::decode_failure(status, &body));
        }

        serde_json::from_slice::<RelayReply>(&body)
            .map_err(|e| TransportFailure::MalformedResponse(e.to_string()).into())
    }
}
