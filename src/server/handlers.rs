//! clipsync - HTTP handlers
//!
//! `GET /read`, `POST /write` and the `/ws` relay upgrade

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::State;
use axum::response::Response;
use axum::Json;

use super::payload::{ContentPayload, MessageResponse, PayloadError};
use super::state::ServerState;
use crate::relay;

/// Return the current cell value
pub async fn read_content(State(state): State<Arc<ServerState>>) -> Json<ContentPayload> {
    Json(ContentPayload {
        content: state.content(),
    })
}

/// Store a value and forward it to the connected peer
pub async fn write_content(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<ContentPayload>, JsonRejection>,
) -> Result<Json<MessageResponse>, PayloadError> {
    let Json(payload) = payload.map_err(|rejection| {
        log::warn!("Rejected write payload: {}", rejection.body_text());
        PayloadError::InvalidPayload
    })?;

    log::info!("write: {}", payload.content.summary());
    state.write(payload.content).await;

    Ok(Json(MessageResponse::content_updated()))
}

/// Upgrade to a relay connection, replacing any existing peer
pub async fn relay_upgrade(
    State(state): State<Arc<ServerState>>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_failed_upgrade(|e| log::warn!("Relay upgrade failed: {}", e))
        .on_upgrade(move |socket| async move {
            let (sender, receiver) = relay::split(socket);
            state.attach(sender, receiver);
        })
}
