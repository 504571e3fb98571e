//! clipsync - Applies values received from the peer to the local clipboard

use std::sync::Arc;

use super::device::{ClipboardDevice, ClipboardError};
use super::marker::PeerMarker;
use super::models::ClipboardValue;

/// Local clipboard writer
#[derive(Clone)]
pub struct LocalWriter {
    device: Arc<dyn ClipboardDevice>,
    marker: PeerMarker,
}

impl LocalWriter {
    pub fn new(device: Arc<dyn ClipboardDevice>, marker: PeerMarker) -> Self {
        Self { device, marker }
    }

    pub fn marker(&self) -> &PeerMarker {
        &self.marker
    }

    /// Write `value` to the clipboard and remember it as the peer's value
    ///
    /// The marker is updated before the write lands so the watcher can never
    /// observe the new clipboard content with a stale marker. Write failures
    /// are logged; the marker keeps the value either way.
    pub async fn apply(&self, value: ClipboardValue) {
        self.marker.record(value.clone());

        let device = Arc::clone(&self.device);
        let summary = value.summary().to_string();
        let result = tokio::task::spawn_blocking(move || device.write_all(value.as_str()))
            .await
            .map_err(|e| ClipboardError::Write(format!("write task failed: {}", e)))
            .and_then(|r| r);

        match result {
            Ok(()) => log::debug!("[Writer] Applied peer value {}", summary),
            Err(e) => log::error!("[Writer] Failed to apply peer value {}: {}", summary, e),
        }
    }
}
