//! Window records, flags, and the window registry.
//!
//! Every surface the engine manages (the coordinator's own window, inline
//! child windows, and popover panels) has exactly one record here, keyed by
//! its host-chosen id. Popover-specific state lives in the popover module;
//! this registry enforces the one-window-per-id invariant across all roles.

mod config;
mod registry;

pub use config::WindowConfig;
pub use registry::{WindowRecord, WindowRegistry, WindowRole, WindowStatus};

use crate::constants::{INLINE_LABEL_PREFIX, POPOVER_LABEL_PREFIX};

/// Derives the native label for an inline window id.
#[must_use]
pub fn inline_label(id: &str) -> String { format!("{INLINE_LABEL_PREFIX}{id}") }

/// Derives the native label for a popover id.
#[must_use]
pub fn popover_label(id: &str) -> String { format!("{POPOVER_LABEL_PREFIX}{id}") }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_derivation() {
        assert_eq!(inline_label("bar"), "inline-window-bar");
        assert_eq!(popover_label("github-issues"), "popover-github-issues");
    }
}
