//! Per-turn lifecycle state.

use serde::Serialize;

use crate::domain::foundation::StateMachine;

/// Where the current turn is in its lifecycle.
///
/// `Settled` is transient: the controller moves straight back to `Idle`
/// once the answer (or failure notice) has been appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnState {
    #[default]
    Idle,
    Sending,
    Settled,
}

impl StateMachine for TurnState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use TurnState::*;
        matches!(
            (self, target),
            (Idle, Sending) | (Sending, Settled) | (Settled, Idle)
        )
    }
}
