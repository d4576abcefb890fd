//! HTTP adapter for the agent endpoints.
//!
//! - `POST /api/agent` - Relay one message to the coaching model
//! - `GET /api/model-card` - Static agent descriptor
//! - `GET /health` - Liveness probe

mod dto;
mod handlers;
mod routes;

pub use dto::{ErrorResponse, RelayMessageRequest, RelayMessageResponse};
pub use handlers::AgentAppState;
pub use routes::{agent_router, agent_routes};
