//! Error types for Pelmet.
//!
//! This module provides the unified error type surfaced by the engine and its
//! collaborators. Native-layer failures are wrapped verbatim; nothing here is
//! retried.

use std::fmt;

/// Errors that can occur while managing windows, popovers, and monitors.
#[derive(Debug)]
pub enum PanelError {
    /// A create was requested for an id that is already live.
    DuplicateId(String),
    /// An operation targeted an id that is not live.
    NotFound(String),
    /// A position descriptor has no soluble axis.
    UnresolvablePosition(String),
    /// The platform could not realize a window surface.
    NativeCreateFailed(String),
    /// The platform could not realize a non-activating floating panel.
    NativePanelUnavailable(String),
    /// The monitor registry has no snapshot yet.
    NoDisplays,
    /// IPC communication error.
    Ipc(String),
    /// IO error.
    Io(std::io::Error),
}

impl fmt::Display for PanelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateId(id) => {
                write!(f, "window '{id}' already exists")
            }
            Self::NotFound(id) => {
                write!(f, "window '{id}' not found")
            }
            Self::UnresolvablePosition(msg) => {
                write!(f, "unresolvable position: {msg}")
            }
            Self::NativeCreateFailed(msg) => {
                write!(f, "native window creation failed: {msg}")
            }
            Self::NativePanelUnavailable(msg) => {
                write!(f, "native panel unavailable: {msg}")
            }
            Self::NoDisplays => write!(f, "no displays available"),
            Self::Ipc(msg) => write!(f, "IPC error: {msg}"),
            Self::Io(err) => write!(f, "IO error: {err}"),
        }
    }
}

impl std::error::Error for PanelError {}

impl From<std::io::Error> for PanelError {
    fn from(err: std::io::Error) -> Self { Self::Io(err) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_id_display() {
        let err = PanelError::DuplicateId("bar".to_string());
        let msg = err.to_string();
        assert!(msg.contains("bar"));
        assert!(msg.contains("already exists"));
    }

    #[test]
    fn test_not_found_display() {
        let err = PanelError::NotFound("spaces".to_string());
        let msg = err.to_string();
        assert!(msg.contains("spaces"));
        assert!(msg.contains("not found"));
    }

    #[test]
    fn test_unresolvable_position_display() {
        let err = PanelError::UnresolvablePosition("missing horizontal fields".to_string());
        assert!(err.to_string().contains("unresolvable position"));
    }

    #[test]
    fn test_native_create_failed_display() {
        let err = PanelError::NativeCreateFailed("surface limit".to_string());
        let msg = err.to_string();
        assert!(msg.contains("native window creation failed"));
        assert!(msg.contains("surface limit"));
    }

    #[test]
    fn test_no_displays_display() {
        assert_eq!(PanelError::NoDisplays.to_string(), "no displays available");
    }

    #[test]
    fn test_io_error_from_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: PanelError = io_err.into();
        assert!(matches!(err, PanelError::Io(_)));
    }

    #[test]
    fn test_error_is_debug() {
        let err = PanelError::DuplicateId("bar".to_string());
        let debug_str = format!("{err:?}");
        assert!(debug_str.contains("DuplicateId"));
    }
}
