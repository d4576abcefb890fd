//! HTTP handlers for the agent endpoints.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::{RelayError, RelayMessageHandler};
use crate::domain::model_card::ModelCard;

use super::dto::{ErrorResponse, RelayMessageRequest, RelayMessageResponse};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

/// Shared state for the agent routes.
#[derive(Clone)]
pub struct AgentAppState {
    pub relay: Arc<RelayMessageHandler>,
    pub model_card: Arc<ModelCard>,
}

impl AgentAppState {
    pub fn new(relay: Arc<RelayMessageHandler>, model_card: ModelCard) -> Self {
        Self {
            relay,
            model_card: Arc::new(model_card),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/agent - Relay one message to the coaching model
///
/// The body is parsed here rather than with the `Json` extractor so that a
/// malformed body yields the relay's internal error shape.
pub async fn relay_message(State(state): State<AgentAppState>, body: Bytes) -> Response {
    let request: RelayMessageRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => {
            tracing::error!(error = %err, "could not parse relay request body");
            return RelayError::Internal.into_response();
        }
    };

    match state.relay.handle(request.into()).await {
        Ok(result) => (
            StatusCode::OK,
            Json(RelayMessageResponse {
                message: result.message,
            }),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

/// GET /api/model-card - Static descriptor of the agent
pub async fn get_model_card(State(state): State<AgentAppState>) -> Json<ModelCard> {
    Json(state.model_card.as_ref().clone())
}

/// GET /health - Liveness probe
pub async fn health() -> &'static str {
    "ok"
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        // Mirrored upstream codes are always valid statuses; fall back to 502 otherwise.
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::BAD_GATEWAY);
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relay_errors_map_to_statuses() {
        assert_eq!(
            RelayError::Validation.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RelayError::Configuration.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            RelayError::Upstream { status: 429 }.into_response().status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            RelayError::Internal.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn out_of_range_upstream_status_becomes_bad_gateway() {
        assert_eq!(
            RelayError::Upstream { status: 1000 }.into_response().status(),
            StatusCode::BAD_GATEWAY
        );
    }
}
