//! Relay client adapters - implementations of the RelayClient port.

mod http_client;
mod in_process;

pub use http_client::HttpRelayClient;
pub use in_process::InProcessRelayClient;
