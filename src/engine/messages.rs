//! Message types for the engine actor.
//!
//! All communication with the engine happens through messages: commands carry
//! a oneshot reply channel and resolve only after the native operation has
//! completed and the registries are updated, which is what gives callers the
//! per-id ordering guarantees.

use tokio::sync::oneshot;

use crate::error::PanelError;
use crate::geometry::PositionDescriptor;
use crate::monitor::Monitor;
use crate::platform::PlatformEvent;
use crate::popover::{OpenPopoverRequest, OpenedPopover};
use crate::windows::WindowConfig;

/// Messages processed by the engine actor, one at a time.
#[derive(Debug)]
pub enum EngineMessage {
    // ════════════════════════════════════════════════════════════════════════
    // Inline window commands
    // ════════════════════════════════════════════════════════════════════════
    /// Create an inline child window and realize its surface.
    CreateInlineWindow {
        id: String,
        /// Override for the child URL; defaults to the coordinator origin
        /// with a `window=<id>` query parameter.
        url: Option<String>,
        position: PositionDescriptor,
        config: WindowConfig,
        respond_to: oneshot::Sender<Result<(), PanelError>>,
    },

    /// Re-solve a window's position descriptor and move its surface.
    UpdateWindowPosition {
        id: String,
        position: PositionDescriptor,
        respond_to: oneshot::Sender<Result<(), PanelError>>,
    },

    /// Show a window.
    ShowWindow {
        id: String,
        respond_to: oneshot::Sender<Result<(), PanelError>>,
    },

    /// Hide a window. Hidden surfaces also become click-through so they
    /// never swallow clicks.
    HideWindow {
        id: String,
        respond_to: oneshot::Sender<Result<(), PanelError>>,
    },

    /// Close a window and free its id.
    CloseWindow {
        id: String,
        /// Suppress `NotFound` for callers that treat close as idempotent.
        idempotent: bool,
        respond_to: oneshot::Sender<Result<(), PanelError>>,
    },

    /// Resize a surface, clamped to the popover's max height when the id
    /// names an open popover.
    SetWindowSize {
        id: String,
        width: f64,
        height: f64,
        respond_to: oneshot::Sender<Result<(), PanelError>>,
    },

    // ════════════════════════════════════════════════════════════════════════
    // Popover commands
    // ════════════════════════════════════════════════════════════════════════
    /// Open a popover, with toggle and exclusive-group semantics.
    OpenPopover {
        request: OpenPopoverRequest,
        respond_to: oneshot::Sender<Result<OpenedPopover, PanelError>>,
    },

    /// Close a popover. Idempotent.
    ClosePopover {
        id: String,
        respond_to: oneshot::Sender<()>,
    },

    /// Close every open popover.
    CloseAllPopovers { respond_to: oneshot::Sender<()> },

    // ════════════════════════════════════════════════════════════════════════
    // Queries
    // ════════════════════════════════════════════════════════════════════════
    /// Current monitor snapshot, primary first.
    GetMonitors {
        respond_to: oneshot::Sender<Result<Vec<Monitor>, PanelError>>,
    },

    /// Ids of live inline windows.
    ListWindows { respond_to: oneshot::Sender<Vec<String>> },

    /// Ids of open popovers.
    GetOpenPopovers { respond_to: oneshot::Sender<Vec<String>> },

    // ════════════════════════════════════════════════════════════════════════
    // Platform callbacks
    // ════════════════════════════════════════════════════════════════════════
    /// An asynchronous platform happening, injected through the backend sink.
    Platform(PlatformEvent),

    // ════════════════════════════════════════════════════════════════════════
    // Internal
    // ════════════════════════════════════════════════════════════════════════
    /// Stop the actor. Open popovers and windows are torn down with the
    /// backend when the state drops.
    Shutdown,
}

impl EngineMessage {
    /// Human-readable message name for logging and panic recovery.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CreateInlineWindow { .. } => "CreateInlineWindow",
            Self::UpdateWindowPosition { .. } => "UpdateWindowPosition",
            Self::ShowWindow { .. } => "ShowWindow",
            Self::HideWindow { .. } => "HideWindow",
            Self::CloseWindow { .. } => "CloseWindow",
            Self::SetWindowSize { .. } => "SetWindowSize",
            Self::OpenPopover { .. } => "OpenPopover",
            Self::ClosePopover { .. } => "ClosePopover",
            Self::CloseAllPopovers { .. } => "CloseAllPopovers",
            Self::GetMonitors { .. } => "GetMonitors",
            Self::ListWindows { .. } => "ListWindows",
            Self::GetOpenPopovers { .. } => "GetOpenPopovers",
            Self::Platform(_) => "Platform",
            Self::Shutdown => "Shutdown",
        }
    }
}
