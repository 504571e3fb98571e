//! clipsync - WebSocket frame adapters
//!
//! The server side speaks axum's WebSocket and the client side speaks
//! tungstenite; both are reduced to the same inbound shape here.

use axum::extract::ws::Message as AxumMessage;
use tokio_tungstenite::tungstenite::Message as TungsteniteMessage;

/// What the relay cares about in an inbound frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// A whole clipboard value
    Text(String),
    /// Peer asked to close
    Close,
    /// Ping/pong and other control frames
    Control,
}

/// A WebSocket message type the relay can carry
pub trait Frame: Sized {
    fn from_text(text: String) -> Self;
    fn into_inbound(self) -> Inbound;
}

impl Frame for AxumMessage {
    fn from_text(text: String) -> Self {
        AxumMessage::Text(text)
    }

    fn into_inbound(self) -> Inbound {
        match self {
            AxumMessage::Text(text) => Inbound::Text(text),
            AxumMessage::Binary(data) => Inbound::Text(String::from_utf8_lossy(&data).into_owned()),
            AxumMessage::Close(_) => Inbound::Close,
            AxumMessage::Ping(_) | AxumMessage::Pong(_) => Inbound::Control,
        }
    }
}

impl Frame for TungsteniteMessage {
    fn from_text(text: String) -> Self {
        TungsteniteMessage::Text(text)
    }

    fn into_inbound(self) -> Inbound {
        match self {
            TungsteniteMessage::Text(text) => Inbound::Text(text),
            TungsteniteMessage::Binary(data) => {
                Inbound::Text(String::from_utf8_lossy(&data).into_owned())
            }
            TungsteniteMessage::Close(_) => Inbound::Close,
            TungsteniteMessage::Ping(_)
            | TungsteniteMessage::Pong(_)
            | TungsteniteMessage::Frame(_) => Inbound::Control,
        }
    }
}
