//! Relay handlers - one inbound chat message, one upstream completion.

mod relay_message;

pub use relay_message::{
    RelayError, RelayMessageCommand, RelayMessageHandler, RelayMessageResult, RelaySettings,
    COACH_SYSTEM_PROMPT,
};
