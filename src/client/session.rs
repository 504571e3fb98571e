//! clipsync - Client session
//!
//! Three activities share one relay connection: the clipboard watcher, the
//! receive loop (local writer) and the send loop.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use crate::clipboard::{ClipboardDevice, ClipboardValue, ClipboardWatcher, LocalWriter, PeerMarker};
use crate::config::ClientSettings;
use crate::relay::{self, ConnectionError, RelayEvent, RelayReceiver, RelaySender};

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The relay connection closed or failed
    ConnectionClosed,
    /// `shutdown` was cancelled
    Shutdown,
}

/// Dial the server and sync until the connection ends or `shutdown` fires
///
/// Only the initial dial is reported as an error.
pub async fn run(
    settings: &ClientSettings,
    device: Arc<dyn ClipboardDevice>,
    shutdown: CancellationToken,
) -> Result<SessionEnd, ConnectionError> {
    let (sender, receiver) = relay::connect(&settings.server_url).await?;
    let marker = PeerMarker::new();

    let (changes_tx, changes_rx) = mpsc::unbounded_channel();
    let (done_tx, done_rx) = oneshot::channel();

    let watcher_cancel = shutdown.child_token();
    let watcher = ClipboardWatcher::new(settings.poll_interval(), marker.clone()).spawn(
        Arc::clone(&device),
        changes_tx,
        watcher_cancel.clone(),
    );

    let writer = LocalWriter::new(device, marker);
    let receive = tokio::spawn(receive_loop(receiver, writer, done_tx));

    let end = send_loop(&sender, changes_rx, done_rx, &shutdown).await;

    watcher_cancel.cancel();
    if let Err(e) = watcher.await {
        log::error!("Clipboard watcher task failed: {}", e);
    }
    receive.abort();

    log::info!("[Relay {}] Session ended: {:?}", sender.id(), end);
    Ok(end)
}

async fn receive_loop(mut receiver: RelayReceiver, writer: LocalWriter, done: oneshot::Sender<()>) {
    while let RelayEvent::Message(value) = receiver.receive().await {
        log::info!("[Relay {}] read: {}", receiver.id(), value.summary());
        writer.apply(value).await;
    }
    let _ = done.send(());
}

async fn send_loop(
    sender: &RelaySender,
    mut changes: mpsc::UnboundedReceiver<ClipboardValue>,
    mut done: oneshot::Receiver<()>,
    shutdown: &CancellationToken,
) -> SessionEnd {
    loop {
        tokio::select! {
            biased;
            _ = &mut done => return SessionEnd::ConnectionClosed,
            _ = shutdown.cancelled() => {
                if let Err(e) = sender.close().await {
                    log::debug!("[Relay {}] Close on shutdown: {}", sender.id(), e);
                }
                return SessionEnd::Shutdown;
            }
            change = changes.recv() => {
                let Some(value) = change else {
                    return SessionEnd::Shutdown;
                };
                match sender.send(&value).await {
                    Ok(()) => log::info!("[Relay {}] send: {}", sender.id(), value.summary()),
                    Err(e) => log::warn!("[Relay {}] {}", sender.id(), e),
                }
            }
        }
    }
}
