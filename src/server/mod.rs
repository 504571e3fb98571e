//! clipsync - Server module
//!
//! HTTP read/write surface plus the relay endpoint

pub mod handlers;
pub mod payload;
pub mod state;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;

pub use payload::{ContentPayload, ErrorResponse, MessageResponse, PayloadError};
pub use state::{ContentCell, ServerState};

/// Build the HTTP router
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/read", get(handlers::read_content))
        .route("/write", post(handlers::write_content))
        .route("/ws", get(handlers::relay_upgrade))
        .with_state(state)
}

/// Serve until the listener fails
pub async fn serve(listener: TcpListener, state: Arc<ServerState>) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        log::info!("Listening on {}", addr);
    }
    axum::serve(listener, router(state)).await
}
