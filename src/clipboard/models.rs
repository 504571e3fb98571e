//! clipsync - Clipboard value model
//!
//! Defines the opaque text blob that travels between clipboard and relay

use std::fmt;

use blake3::Hasher;
use serde::{Deserialize, Serialize};

/// Default preview length used in log lines
pub const PREVIEW_LEN: usize = 32;

/// Current clipboard content
///
/// Opaque text with exact string equality. An empty value is a valid
/// content update (the clipboard was cleared).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClipboardValue(String);

impl ClipboardValue {
    /// Create a value from text
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Short content digest for log lines (first 8 hex chars of blake3)
    pub fn digest(&self) -> String {
        let mut hasher = Hasher::new();
        hasher.update(self.0.as_bytes());
        let hex = hasher.finalize().to_hex();
        hex[..8].to_string()
    }

    /// Generate preview text
    pub fn preview(&self, max_len: usize) -> String {
        let text = self.0.trim();
        if text.chars().count() <= max_len {
            text.to_string()
        } else {
            let truncated: String = text.chars().take(max_len).collect();
            format!("{}...", truncated)
        }
    }

    /// Loggable form: preview plus digest, never the full content
    pub fn summary(&self) -> Summary<'_> {
        Summary(self)
    }
}

impl From<String> for ClipboardValue {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for ClipboardValue {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl From<ClipboardValue> for String {
    fn from(value: ClipboardValue) -> Self {
        value.0
    }
}

impl PartialEq<str> for ClipboardValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ClipboardValue {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Display adapter returned by [`ClipboardValue::summary`]
pub struct Summary<'a>(&'a ClipboardValue);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} ({} bytes, {})",
            self.0.preview(PREVIEW_LEN),
            self.0.len(),
            self.0.digest()
        )
    }
}
