//! Axum router configuration for the agent endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{get_model_card, health, relay_message, AgentAppState};

/// Create the agent API router.
///
/// # Routes
/// - `POST /agent` - Relay one message
/// - `GET /model-card` - Agent descriptor
pub fn agent_routes() -> Router<AgentAppState> {
    Router::new()
        .route("/agent", post(relay_message))
        .route("/model-card", get(get_model_card))
}

/// Create the complete agent router: API routes under `/api` plus `/health`.
///
/// # Example
///
/// ```ignore
/// let app = agent_router().with_state(AgentAppState::new(relay, card));
/// ```
pub fn agent_router() -> Router<AgentAppState> {
    Router::new()
        .nest("/api", agent_routes())
        .route("/health", get(health))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::application::{RelayMessageHandler, RelaySettings};
    use crate::domain::model_card::ModelCard;
    use crate::ports::AIProvider;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    // ───────────────────────────────────────────────────────────────
    // Test infrastructure
    // ───────────────────────────────────────────────────────────────

    fn app_with(provider: Option<MockAIProvider>) -> Router {
        let provider = provider.map(|p| Arc::new(p) as Arc<dyn AIProvider>);
        let relay = Arc::new(RelayMessageHandler::new(provider, RelaySettings::default()));
        agent_router().with_state(AgentAppState::new(
            relay,
            ModelCard::pitcoach_mint("http://localhost:8080"),
        ))
    }

    fn post_agent(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/agent")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn read_body(response: axum::response::Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    async fn read_json(response: axum::response::Response) -> Value {
        serde_json::from_slice(&read_body(response).await).unwrap()
    }

    // ───────────────────────────────────────────────────────────────
    // Tests
    // ───────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn agent_relays_reply() {
        let app = app_with(Some(MockAIProvider::new().with_response("스트레칭을 추천합니다")));

        let response = app
            .oneshot(post_agent(r#"{"message":"무릎이 아파요"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            read_json(response).await,
            serde_json::json!({ "message": "스트레칭을 추천합니다" })
        );
    }

    #[tokio::test]
    async fn empty_missing_or_null_message_is_400() {
        for body in [r#"{"message":""}"#, "{}", r#"{"message":null}"#] {
            let provider = MockAIProvider::new();
            let app = app_with(Some(provider.clone()));

            let response = app.oneshot(post_agent(body)).await.unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
            assert_eq!(read_json(response).await["error"], "메시지가 필요합니다.");
            assert_eq!(provider.call_count(), 0);
        }
    }

    #[tokio::test]
    async fn malformed_body_is_500() {
        for body in ["not json", r#"{"message":42}"#] {
            let app = app_with(Some(MockAIProvider::new()));

            let response = app.oneshot(post_agent(body)).await.unwrap();

            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(read_json(response).await["error"], "서버 오류가 발생했습니다.");
        }
    }

    #[tokio::test]
    async fn missing_credential_is_500_with_phrase() {
        let app = app_with(None);

        let response = app.oneshot(post_agent(r#"{"message":"hi"}"#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let error = read_json(response).await["error"].as_str().unwrap().to_string();
        assert!(error.contains("API 키가 설정되지 않았습니다"));
    }

    #[tokio::test]
    async fn upstream_status_is_mirrored_without_upstream_body() {
        let app = app_with(Some(MockAIProvider::new().with_error(MockError::status(429))));

        let response = app.oneshot(post_agent(r#"{"message":"hi"}"#)).await.unwrap();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        let body = read_json(response).await;
        assert_eq!(body, serde_json::json!({ "error": "OpenAI API 오류: 429" }));
    }

    #[tokio::test]
    async fn model_card_is_byte_identical_across_calls() {
        let app = app_with(None);

        let first = read_body(app.clone().oneshot(get("/api/model-card")).await.unwrap()).await;
        let second = read_body(app.oneshot(get("/api/model-card")).await.unwrap()).await;

        assert_eq!(first, second);
        let card: Value = serde_json::from_slice(&first).unwrap();
        assert_eq!(card["model_name"], "my-first-mcp-agent");
        assert_eq!(card["api_endpoint"], "http://localhost:8080/api/agent");
        assert_eq!(card["api_method"], "POST");
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let response = app_with(None).oneshot(get("/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_body(response).await, b"ok");
    }

    #[tokio::test]
    async fn agent_rejects_get() {
        let response = app_with(None).oneshot(get("/api/agent")).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
