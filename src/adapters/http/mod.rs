//! HTTP adapters - REST API implementations.

pub mod agent;
mod layers;

pub use agent::{agent_router, AgentAppState};
pub use layers::apply_layers;

use axum::Router;

/// Builds the complete application: agent routes, state and layer stack.
pub fn build_app(state: AgentAppState, cors_origins: &[String]) -> Router {
    apply_layers(agent_router().with_state(state), cors_origins)
}
