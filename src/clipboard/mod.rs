//! clipsync - Clipboard module
//!
//! Local clipboard access, change watching and echo-aware writing

pub mod device;
pub mod marker;
pub mod models;
pub mod monitor;
pub mod writer;

pub use device::{ClipboardDevice, ClipboardError, MemoryClipboard, SystemClipboard};
pub use marker::PeerMarker;
pub use models::ClipboardValue;
pub use monitor::{ClipboardWatcher, DEFAULT_POLL_INTERVAL};
pub use writer::LocalWriter;
