//! Process-wide constants.

/// Application identifier used for config and socket paths.
pub const APP_NAME: &str = "pelmet";

/// Label prefix for inline child windows.
pub const INLINE_LABEL_PREFIX: &str = "inline-window-";

/// Label prefix for popover panels.
pub const POPOVER_LABEL_PREFIX: &str = "popover-";

/// Label of the coordinator's own surface.
pub const COORDINATOR_LABEL: &str = "main";

/// Origin handed to child windows when the caller does not override the URL.
pub const DEFAULT_ORIGIN: &str = "pelmet://localhost/";

/// Environment variable carrying the context descriptor of a child surface.
pub const CONTEXT_ENV_VAR: &str = "PELMET_CONTEXT";

/// Timing constants, grouped for discoverability.
pub mod timing {
    /// Coalesce window for display reconfiguration notifications.
    ///
    /// Consecutive native notifications within this window produce at most
    /// one downstream topology event.
    pub const MONITOR_COALESCE_MS: u64 = 150;
}

/// Geometry constants.
pub mod geometry {
    /// Floor for a popover's available height below its anchor.
    pub const MIN_POPOVER_HEIGHT: f64 = 100.0;

    /// Default vertical gap between an anchor and its popover.
    pub const DEFAULT_POPOVER_OFFSET_Y: f64 = 8.0;
}

/// Engine channel sizing.
pub mod channel {
    /// Buffer size for the engine actor's mailbox.
    pub const ENGINE_BUFFER_SIZE: usize = 256;
}
