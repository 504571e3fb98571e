//! clipsync - Last value received from the peer
//!
//! Shared between the local writer (sets it) and the watcher (consults it).
//! Purely advisory: it only suppresses echoes, it says nothing about what the
//! clipboard actually holds.

use std::sync::Arc;

use parking_lot::RwLock;

use super::models::ClipboardValue;

#[derive(Debug, Clone, Default)]
pub struct PeerMarker {
    last: Arc<RwLock<Option<ClipboardValue>>>,
}

impl PeerMarker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a value just received from the peer
    pub fn record(&self, value: ClipboardValue) {
        *self.last.write() = Some(value);
    }

    /// Whether `value` is the most recent value received from the peer
    pub fn matches(&self, value: &ClipboardValue) -> bool {
        self.last.read().as_ref() == Some(value)
    }

    pub fn get(&self) -> Option<ClipboardValue> {
        self.last.read().clone()
    }
}
