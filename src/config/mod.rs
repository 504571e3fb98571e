//! clipsync - Configuration module

pub mod settings;

pub use settings::{ClientSettings, ConfigError, HttpSettings, ServerSettings, Settings};
