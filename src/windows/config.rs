//! Native window flags.

use serde::{Deserialize, Serialize};

/// Flags applied to a native surface at creation time.
///
/// The defaults describe a bar: transparent, borderless, always on top, out
/// of the taskbar, not resizable. Floating utility windows differ only in
/// [`always_on_top`](Self::always_on_top); use [`WindowConfig::floating`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WindowConfig {
    pub transparent: bool,
    pub always_on_top: bool,
    pub resizable: bool,
    pub decorations: bool,
    pub skip_taskbar: bool,
    /// When set, the surface ignores cursor events entirely.
    pub click_through: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            transparent: true,
            always_on_top: true,
            resizable: false,
            decorations: false,
            skip_taskbar: true,
            click_through: false,
        }
    }
}

impl WindowConfig {
    /// Defaults for a floating utility window: like a bar, but not pinned
    /// above other windows.
    #[must_use]
    pub fn floating() -> Self {
        Self {
            always_on_top: false,
            ..Self::default()
        }
    }
}
