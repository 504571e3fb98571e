//! clipsync - Settings module
//!
//! Defaults reproduce the fixed addresses of the relay; a JSON settings file
//! and command-line flags can override them.

use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

/// Settings error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid settings file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerSettings {
    /// HTTP listen address
    pub listen_addr: SocketAddr,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
        }
    }
}

/// Client settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientSettings {
    /// Relay endpoint
    pub server_url: String,
    /// Clipboard polling interval (milliseconds)
    pub poll_interval_ms: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: "ws://localhost:8080/ws".to_string(),
            poll_interval_ms: 1000,
        }
    }
}

impl ClientSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Check the relay URL scheme and the polling interval
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_url("client.server_url", &self.server_url, &["ws", "wss"])?;

        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "client.poll_interval_ms",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

/// HTTP surface settings (one-shot client)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HttpSettings {
    /// Base URL of the server's HTTP listener
    pub base_url: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
        }
    }
}

impl HttpSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_url("http.base_url", &self.base_url, &["http", "https"])
    }
}

/// All settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub client: ClientSettings,
    pub http: HttpSettings,
}

impl Settings {
    /// Load settings from a JSON file, or defaults when no path is given
    ///
    /// Fields missing from the file keep their defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Settings::default());
        };

        log::info!("Loading settings from {:?}", path);
        let text = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&text)?;
        Ok(settings)
    }

    /// Check every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.client.validate()?;
        self.http.validate()
    }
}

fn check_url(field: &'static str, value: &str, schemes: &[&str]) -> Result<(), ConfigError> {
    let url = Url::parse(value).map_err(|e| ConfigError::Invalid {
        field,
        reason: format!("{}: {}", value, e),
    })?;

    if !schemes.contains(&url.scheme()) {
        return Err(ConfigError::Invalid {
            field,
            reason: format!("unsupported scheme {:?} (expected {})", url.scheme(), schemes.join("/")),
        });
    }

    Ok(())
}
