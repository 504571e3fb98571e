//! clipsync - Clipboard relay
//!
//! Synchronizes clipboard content between a local machine and a remote peer
//! over one persistent WebSocket connection, with an HTTP surface on the
//! server for reading or injecting content.

pub mod client;
pub mod clipboard;
pub mod config;
pub mod relay;
pub mod server;

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use clipboard::SystemClipboard;
use config::{ClientSettings, ServerSettings};
use server::ServerState;

/// Initialize the logger
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}

/// Bind the listener and serve until it fails
///
/// A bind failure is returned; the caller treats it as fatal.
pub async fn run_server(settings: &ServerSettings) -> std::io::Result<()> {
    let listener = TcpListener::bind(settings.listen_addr).await?;
    let state = ServerState::new();
    server::serve(listener, state).await
}

/// Run a client session against the system clipboard
pub async fn run_client(
    settings: &ClientSettings,
    shutdown: CancellationToken,
) -> Result<client::SessionEnd, relay::ConnectionError> {
    let device = Arc::new(SystemClipboard::new());
    client::run(settings, device, shutdown).await
}
