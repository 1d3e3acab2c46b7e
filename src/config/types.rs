//! Configuration types.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::geometry::PositionDescriptor;
use crate::windows::WindowConfig;

/// Errors loading the configuration file.
#[derive(Debug)]
pub enum ConfigError {
    /// No configuration file exists at any search path.
    NotFound,
    /// The file exists but could not be read.
    Io(std::io::Error),
    /// The file exists but is not valid JSON.
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "no configuration file found"),
            Self::Io(err) => write!(f, "failed to read configuration: {err}"),
            Self::Parse(msg) => write!(f, "failed to parse configuration: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// A window the coordinator declares at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowDeclaration {
    /// Host-chosen unique id.
    pub id: String,
    /// Override for the child URL; defaults to the coordinator origin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub position: PositionDescriptor,
    #[serde(default)]
    pub window: WindowConfig,
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PelmetConfig {
    /// Tracing filter, same syntax as `RUST_LOG`.
    pub log_filter: Option<String>,
    /// Override for the IPC socket path.
    pub socket_path: Option<PathBuf>,
    /// Override for the origin prepended to child URLs.
    pub origin: Option<String>,
    /// Focus the inline window under the cursor as it moves.
    pub hover_focus: bool,
    /// Hide the coordinator surface once every declared window is realized.
    pub hide_coordinator: bool,
    /// Inline windows declared at startup.
    pub windows: Vec<WindowDeclaration>,
}
