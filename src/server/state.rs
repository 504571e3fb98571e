//! clipsync - Server session state
//!
//! Owns the last known clipboard value and the single connected peer.
//! Handlers receive it through axum `State`.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;

use crate::clipboard::ClipboardValue;
use crate::relay::{ConnectionId, RelayEvent, RelayReceiver, RelaySender};

/// The shared state cell
///
/// Reads and writes are atomic; the last write to finish wins.
#[derive(Debug, Default)]
pub struct ContentCell {
    value: RwLock<ClipboardValue>,
}

impl ContentCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value (empty if never set)
    pub fn get(&self) -> ClipboardValue {
        self.value.read().clone()
    }

    pub fn set(&self, value: ClipboardValue) {
        *self.value.write() = value;
    }
}

/// The connected peer: its sending half plus the token stopping its
/// receive loop
#[derive(Debug)]
struct ActivePeer {
    sender: RelaySender,
    cancel: CancellationToken,
}

/// Server session
#[derive(Debug, Default)]
pub struct ServerState {
    cell: ContentCell,
    peer: Mutex<Option<ActivePeer>>,
}

impl ServerState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Current cell value
    pub fn content(&self) -> ClipboardValue {
        self.cell.get()
    }

    /// Store `value` and forward it to the connected peer, if any
    ///
    /// A missing peer or a failed send is logged, never reported.
    pub async fn write(&self, value: ClipboardValue) {
        self.cell.set(value.clone());
        self.forward(&value).await;
    }

    async fn forward(&self, value: &ClipboardValue) {
        let sender = self.peer.lock().as_ref().map(|peer| peer.sender.clone());
        let Some(sender) = sender else {
            log::debug!("No relay peer connected, not forwarding {}", value.summary());
            return;
        };

        match sender.send(value).await {
            Ok(()) => log::info!("[Relay {}] send: {}", sender.id(), value.summary()),
            Err(e) => log::warn!("[Relay {}] {}", sender.id(), e),
        }
    }

    /// Id of the connected peer, if any
    pub fn peer_id(&self) -> Option<ConnectionId> {
        self.peer.lock().as_ref().map(|peer| peer.sender.id())
    }

    /// Make a freshly accepted connection the active peer
    ///
    /// The previous peer's receive loop is cancelled before the new one is
    /// installed and the new receive loop starts right away. The close frame
    /// for the old connection goes out from its own task, since a send
    /// stalled on that connection holds its sink.
    pub fn attach(self: &Arc<Self>, sender: RelaySender, receiver: RelayReceiver) {
        let cancel = CancellationToken::new();
        let id = sender.id();

        let previous = {
            let mut slot = self.peer.lock();
            let previous = slot.take();
            if let Some(old) = &previous {
                old.cancel.cancel();
            }
            *slot = Some(ActivePeer {
                sender,
                cancel: cancel.clone(),
            });
            previous
        };

        tokio::spawn(receive_loop(Arc::clone(self), receiver, cancel));
        log::info!("[Relay {}] Peer attached", id);

        if let Some(old) = previous {
            log::info!("[Relay {}] Replaced by {}", old.sender.id(), id);
            tokio::spawn(async move {
                if let Err(e) = old.sender.close().await {
                    log::debug!("[Relay {}] Close after replacement: {}", old.sender.id(), e);
                }
            });
        }
    }

    // Clears the slot only if it still holds this connection
    fn detach(&self, id: ConnectionId) {
        let mut slot = self.peer.lock();
        if slot.as_ref().map(|peer| peer.sender.id()) == Some(id) {
            *slot = None;
            log::info!("[Relay {}] Peer detached", id);
        }
    }
}

async fn receive_loop(state: Arc<ServerState>, mut receiver: RelayReceiver, cancel: CancellationToken) {
    let id = receiver.id();
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                log::debug!("[Relay {}] Receive loop cancelled", id);
                return;
            }
            event = receiver.receive() => {
                match event {
                    RelayEvent::Message(value) => {
                        log::info!("[Relay {}] read: {}", id, value.summary());
                        state.cell.set(value);
                    }
                    RelayEvent::Closed => break,
                }
            }
        }
    }
    state.detach(id);
}
