//! clipsync - Clipboard device access
//!
//! The OS clipboard is an external black box; everything here reports
//! failures as `ClipboardError` and callers log them.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use arboard::Clipboard;
use parking_lot::Mutex;

/// Clipboard I/O error type
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("Clipboard read failed: {0}")]
    Read(String),
    #[error("Clipboard write failed: {0}")]
    Write(String),
}

/// Read/write access to a text clipboard
///
/// Both calls may block; async callers run them on the blocking pool.
pub trait ClipboardDevice: Send + Sync + 'static {
    /// Read the whole clipboard as text
    fn read_all(&self) -> Result<String, ClipboardError>;

    /// Replace the clipboard with `text`
    fn write_all(&self, text: &str) -> Result<(), ClipboardError>;
}

/// System clipboard backed by arboard
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }

    // A fresh instance per call so each read observes the latest data
    fn open() -> Result<Clipboard, ClipboardError> {
        Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))
    }
}

impl ClipboardDevice for SystemClipboard {
    fn read_all(&self) -> Result<String, ClipboardError> {
        let mut clipboard = Self::open()?;
        match clipboard.get_text() {
            Ok(text) => Ok(text),
            // Empty clipboard or non-text content reads as empty text
            Err(arboard::Error::ContentNotAvailable) => Ok(String::new()),
            Err(e) => Err(ClipboardError::Read(e.to_string())),
        }
    }

    fn write_all(&self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard = Self::open()?;
        clipboard
            .set_text(text)
            .map_err(|e| ClipboardError::Write(e.to_string()))
    }
}

/// In-process clipboard
///
/// Used for headless runs and tests. Failures can be switched on to
/// exercise the "log and continue" paths.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    content: Mutex<String>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with initial content
    pub fn with_content(text: impl Into<String>) -> Self {
        let clipboard = Self::default();
        *clipboard.content.lock() = text.into();
        clipboard
    }

    /// Set content as if the user copied it
    pub fn set(&self, text: impl Into<String>) {
        *self.content.lock() = text.into();
    }

    /// Current content, bypassing failure injection
    pub fn get(&self) -> String {
        self.content.lock().clone()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of `read_all` calls so far, failed ones included
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of successful `write_all` calls so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl ClipboardDevice for MemoryClipboard {
    fn read_all(&self) -> Result<String, ClipboardError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ClipboardError::Read("injected read failure".to_string()));
        }
        Ok(self.content.lock().clone())
    }

    fn write_all(&self, text: &str) -> Result<(), ClipboardError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ClipboardError::Write("injected write failure".to_string()));
        }
        *self.content.lock() = text.to_string();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
