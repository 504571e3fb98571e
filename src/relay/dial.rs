//! clipsync - Dialing the relay endpoint

use tokio_tungstenite::connect_async;

use super::channel::{split, RelayReceiver, RelaySender};
use super::ConnectionError;

/// Open a relay connection to a `ws://` or `wss://` URL
///
/// The upgrade handshake is the only negotiation; there is no retry.
pub async fn connect(url: &str) -> Result<(RelaySender, RelayReceiver), ConnectionError> {
    log::info!("connecting to {}", url);

    let (socket, response) = connect_async(url).await.map_err(|e| ConnectionError::Dial {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    let (sender, receiver) = split(socket);
    log::info!(
        "[Relay {}] Connected to {} (status {})",
        sender.id(),
        url,
        response.status()
    );
    Ok((sender, receiver))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dial_refused_is_connection_error() {
        // Bind then drop to get a port nothing listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = connect(&format!("ws://{}/ws", addr)).await;
        assert!(matches!(result, Err(ConnectionError::Dial { .. })));
    }
}
