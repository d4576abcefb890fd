//! HTTP DTOs for the agent endpoints.

use serde::{Deserialize, Serialize};

use crate::application::{RelayError, RelayMessageCommand};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/agent`.
///
/// `message` may be absent or null; that is reported as a validation error by
/// the relay rather than as a parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelayMessageRequest {
    #[serde(default)]
    pub message: Option<String>,
}

impl From<RelayMessageRequest> for RelayMessageCommand {
    fn from(req: RelayMessageRequest) -> Self {
        RelayMessageCommand {
            message: req.message,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Successful relay response.
#[derive(Debug, Clone, Serialize)]
pub struct RelayMessageResponse {
    pub message: String,
}

/// Error body shared by every failing agent endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&RelayError> for ErrorResponse {
    fn from(err: &RelayError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}
