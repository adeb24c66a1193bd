//! Configuration types for the postbot client.
//!
//! This module defines the configuration schema: where the chat endpoint
//! lives, how long the client waits before greeting and before showing a
//! reply, and where coordinates for location lookups come from.

use crate::conversation::Timing;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory holding the client configuration, relative to the working directory.
pub const CONFIG_DIR: &str = ".postbot";

/// Main configuration for postbot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Chat endpoint receiving every turn.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Title shown on the chat window.
    #[serde(default = "default_title")]
    pub title: String,

    /// Delay before the synthetic greeting after the window opens.
    #[serde(default = "default_delay_ms")]
    pub greeting_delay_ms: u64,

    /// Delay between a reply arriving and it being shown.
    #[serde(default = "default_delay_ms")]
    pub reply_delay_ms: u64,

    /// Source of coordinates for location lookups.
    #[serde(default)]
    pub location: LocationConfig,
}

fn default_endpoint() -> String {
    "http://127.0.0.1:5000/chatbot".into()
}

fn default_title() -> String {
    "India Post Assistant".into()
}

fn default_delay_ms() -> u64 {
    500
}

/// Where the client gets coordinates from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum LocationConfig {
    /// Location lookups are not supported.
    #[default]
    Disabled,
    /// Always report the same coordinates.
    Fixed { latitude: f64, longitude: f64 },
    /// Ask a geolocation service over HTTP.
    Lookup { url: String },
}

impl Config {
    /// Default config file location (`.postbot/config.json`).
    pub fn default_path() -> PathBuf {
        Path::new(CONFIG_DIR).join("config.json")
    }

    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Load configuration from a file, falling back to defaults when it
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Delays used by the conversation state machine.
    pub fn timing(&self) -> Timing {
        Timing {
            greeting_delay: Duration::from_millis(self.greeting_delay_ms),
            reply_delay: Duration::from_millis(self.reply_delay_ms),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            title: default_title(),
            greeting_delay_ms: default_delay_ms(),
            reply_delay_ms: default_delay_ms(),
            location: LocationConfig::default(),
        }
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}
