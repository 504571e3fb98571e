//! clipsync - Clipboard monitoring module
//!
//! Polls the local clipboard and surfaces changed content as events

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::device::{ClipboardDevice, ClipboardError};
use super::marker::PeerMarker;
use super::models::ClipboardValue;

/// Default polling interval
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Clipboard watcher
pub struct ClipboardWatcher {
    /// Polling interval
    poll_interval: Duration,
    /// Value seen on the last emitting (or echo-suppressed) poll
    previous: ClipboardValue,
    /// Last value received from the peer
    peer: PeerMarker,
}

impl ClipboardWatcher {
    /// Create a new watcher
    pub fn new(poll_interval: Duration, peer: PeerMarker) -> Self {
        Self {
            poll_interval,
            previous: ClipboardValue::default(),
            peer,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Compare one poll result against the previous value and the peer marker
    ///
    /// Returns the value to emit, if any.
    pub fn observe(&mut self, current: ClipboardValue) -> Option<ClipboardValue> {
        if current == self.previous {
            return None;
        }

        if self.peer.matches(&current) {
            log::debug!("[Watcher] Suppressing echo of peer value {}", current.summary());
            self.previous = current;
            return None;
        }

        self.previous = current.clone();
        Some(current)
    }

    /// Start polling on a tokio task
    ///
    /// Every change is pushed to `changes` in detection order. The task ends
    /// when `cancel` fires or the receiving side of `changes` is dropped.
    pub fn spawn(
        mut self,
        device: Arc<dyn ClipboardDevice>,
        changes: mpsc::UnboundedSender<ClipboardValue>,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            log::info!(
                "Clipboard watcher started with {}ms interval",
                self.poll_interval.as_millis()
            );

            let mut ticker = tokio::time::interval(self.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                let current = match read_blocking(&device).await {
                    Ok(text) => ClipboardValue::from(text),
                    Err(e) => {
                        log::warn!("[Watcher] {}", e);
                        continue;
                    }
                };

                if let Some(value) = self.observe(current) {
                    log::debug!("[Watcher] New content detected: {}", value.summary());
                    if changes.send(value).is_err() {
                        log::debug!("[Watcher] Change receiver dropped");
                        break;
                    }
                }
            }

            log::info!("Clipboard watcher stopped");
        })
    }
}

async fn read_blocking(device: &Arc<dyn ClipboardDevice>) -> Result<String, ClipboardError> {
    let device = Arc::clone(device);
    tokio::task::spawn_blocking(move || device.read_all())
        .await
        .map_err(|e| ClipboardError::Read(format!("read task failed: {}", e)))?
}
