//! Platform surface backends.
//!
//! The engine manipulates native surfaces only through [`PlatformBackend`],
//! so the lifecycle logic is identical on every platform and fully testable.
//! Two implementations ship:
//!
//! - [`headless::HeadlessBackend`] - in-memory surfaces for tests and
//!   non-macOS builds; platform events are injected by hand.
//! - `macos::MacosBackend` - real `NSWindow`/`NSPanel` surfaces
//!   (`cfg(target_os = "macos")` only).
//!
//! Backends push asynchronous platform happenings (display reconfiguration,
//! panel blur, cursor movement) into the engine's mailbox through the sink
//! installed with [`PlatformBackend::set_event_sink`], which serializes them
//! with in-flight commands.

pub mod headless;
#[cfg(target_os = "macos")]
pub mod macos;

use tokio::sync::mpsc;

use crate::error::PanelError;
use crate::geometry::Rect;
use crate::monitor::Monitor;
use crate::windows::WindowConfig;

/// An asynchronous happening reported by the platform.
#[derive(Debug, Clone, PartialEq)]
pub enum PlatformEvent {
    /// The display topology changed in some way; the engine re-queries the
    /// monitor table after coalescing.
    DisplaysChanged,
    /// A panel stopped being the key window.
    PanelBlurred { label: String },
    /// The cursor moved, in virtual-desktop logical pixels.
    CursorMoved { x: f64, y: f64 },
}

/// Native surface operations.
///
/// All methods run on the engine task, which stands in for the platform's UI
/// thread. Implementations deliver callbacks through the installed sink, never
/// by calling back into the engine directly.
pub trait PlatformBackend: Send {
    /// Short backend name for logging.
    fn name(&self) -> &'static str;

    /// Installs the channel platform events are delivered through.
    fn set_event_sink(&mut self, sink: mpsc::UnboundedSender<PlatformEvent>);

    /// Queries the current display table.
    ///
    /// # Errors
    ///
    /// [`PanelError::NoDisplays`] if the platform reports none.
    fn monitors(&mut self) -> Result<Vec<Monitor>, PanelError>;

    /// Creates and shows a window surface.
    ///
    /// # Errors
    ///
    /// [`PanelError::NativeCreateFailed`] if the surface cannot be realized.
    fn create_window(
        &mut self,
        label: &str,
        url: &str,
        rect: Rect,
        config: &WindowConfig,
    ) -> Result<(), PanelError>;

    /// Creates and shows a non-activating floating panel.
    ///
    /// # Errors
    ///
    /// [`PanelError::NativePanelUnavailable`] if the platform cannot realize
    /// such a panel.
    fn create_panel(&mut self, label: &str, url: &str, rect: Rect) -> Result<(), PanelError>;

    /// Moves a surface to a new origin.
    ///
    /// # Errors
    ///
    /// [`PanelError::NotFound`] for an unknown label.
    fn move_window(&mut self, label: &str, x: f64, y: f64) -> Result<(), PanelError>;

    /// Resizes a surface.
    ///
    /// # Errors
    ///
    /// [`PanelError::NotFound`] for an unknown label.
    fn resize_window(&mut self, label: &str, width: f64, height: f64) -> Result<(), PanelError>;

    /// Shows a surface.
    ///
    /// # Errors
    ///
    /// [`PanelError::NotFound`] for an unknown label.
    fn show_window(&mut self, label: &str) -> Result<(), PanelError>;

    /// Hides a surface.
    ///
    /// # Errors
    ///
    /// [`PanelError::NotFound`] for an unknown label.
    fn hide_window(&mut self, label: &str) -> Result<(), PanelError>;

    /// Destroys a surface.
    ///
    /// # Errors
    ///
    /// [`PanelError::NotFound`] for an unknown label.
    fn close_window(&mut self, label: &str) -> Result<(), PanelError>;

    /// Gives a surface keyboard focus.
    ///
    /// # Errors
    ///
    /// [`PanelError::NotFound`] for an unknown label.
    fn focus_window(&mut self, label: &str) -> Result<(), PanelError>;

    /// Toggles whether a surface ignores cursor events.
    ///
    /// # Errors
    ///
    /// [`PanelError::NotFound`] for an unknown label.
    fn set_click_through(&mut self, label: &str, ignore: bool) -> Result<(), PanelError>;
}
