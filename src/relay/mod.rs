//! clipsync - Relay module
//!
//! The persistent duplex text-message connection between client and server

pub mod channel;
pub mod dial;
pub mod frame;

pub use channel::{split, ConnectionId, RelayEvent, RelayReceiver, RelaySender};
pub use dial::connect;

/// Relay connection error type
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("dial {url}: {reason}")]
    Dial { url: String, reason: String },
    #[error("send failed: {0}")]
    Send(String),
    #[error("read failed: {0}")]
    Receive(String),
}
