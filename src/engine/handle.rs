//! Handle for communicating with the engine actor.
//!
//! The handle is cheap to clone and safe to use from any thread; every method
//! posts a message into the engine's mailbox and awaits the reply, so callers
//! observe operations in issue order.

use tokio::sync::{mpsc, oneshot};

use super::messages::EngineMessage;
use crate::error::PanelError;
use crate::geometry::PositionDescriptor;
use crate::monitor::Monitor;
use crate::platform::PlatformEvent;
use crate::popover::{OpenPopoverRequest, OpenedPopover};
use crate::windows::WindowConfig;

/// Transport-level failures talking to the engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The engine's mailbox is closed (actor stopped).
    #[error("failed to send message to engine: channel closed")]
    SendFailed,

    /// The engine dropped the reply channel without answering.
    #[error("failed to receive reply from engine: channel closed")]
    ReceiveFailed,
}

impl From<EngineError> for PanelError {
    fn from(err: EngineError) -> Self { Self::Ipc(err.to_string()) }
}

/// Cloneable request side of the engine.
#[derive(Clone)]
pub struct EngineHandle {
    sender: mpsc::Sender<EngineMessage>,
}

impl EngineHandle {
    pub(crate) const fn new(sender: mpsc::Sender<EngineMessage>) -> Self { Self { sender } }

    /// Posts a message and awaits its oneshot reply.
    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> EngineMessage,
    ) -> Result<T, EngineError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(build(tx))
            .await
            .map_err(|_| EngineError::SendFailed)?;
        rx.await.map_err(|_| EngineError::ReceiveFailed)
    }

    // ========================================================================
    // Inline windows
    // ========================================================================

    /// Creates an inline child window.
    ///
    /// # Errors
    ///
    /// `DuplicateId`, `UnresolvablePosition`, `NativeCreateFailed`, or a
    /// transport failure mapped to `Ipc`.
    pub async fn create_inline_window(
        &self,
        id: &str,
        url: Option<String>,
        position: PositionDescriptor,
        config: WindowConfig,
    ) -> Result<(), PanelError> {
        let id = id.to_string();
        self.request(|respond_to| EngineMessage::CreateInlineWindow {
            id,
            url,
            position,
            config,
            respond_to,
        })
        .await?
    }

    /// Re-solves and applies a window's position descriptor.
    ///
    /// # Errors
    ///
    /// `NotFound` or `UnresolvablePosition`.
    pub async fn update_window_position(
        &self,
        id: &str,
        position: PositionDescriptor,
    ) -> Result<(), PanelError> {
        let id = id.to_string();
        self.request(|respond_to| EngineMessage::UpdateWindowPosition { id, position, respond_to })
            .await?
    }

    /// Shows a window.
    ///
    /// # Errors
    ///
    /// `NotFound` if the id is not live.
    pub async fn show_window(&self, id: &str) -> Result<(), PanelError> {
        let id = id.to_string();
        self.request(|respond_to| EngineMessage::ShowWindow { id, respond_to }).await?
    }

    /// Hides a window.
    ///
    /// # Errors
    ///
    /// `NotFound` if the id is not live.
    pub async fn hide_window(&self, id: &str) -> Result<(), PanelError> {
        let id = id.to_string();
        self.request(|respond_to| EngineMessage::HideWindow { id, respond_to }).await?
    }

    /// Closes a window.
    ///
    /// # Errors
    ///
    /// `NotFound` if the id is not live.
    pub async fn close_window(&self, id: &str) -> Result<(), PanelError> {
        let id = id.to_string();
        self.request(|respond_to| EngineMessage::CloseWindow {
            id,
            idempotent: false,
            respond_to,
        })
        .await?
    }

    /// Closes a window, treating a missing id as success.
    ///
    /// # Errors
    ///
    /// Native close failures only.
    pub async fn close_window_idempotent(&self, id: &str) -> Result<(), PanelError> {
        let id = id.to_string();
        self.request(|respond_to| EngineMessage::CloseWindow {
            id,
            idempotent: true,
            respond_to,
        })
        .await?
    }

    /// Resizes a surface; popover heights are clamped to their max height.
    ///
    /// # Errors
    ///
    /// `NotFound` if the id is not live.
    pub async fn set_window_size(&self, id: &str, width: f64, height: f64) -> Result<(), PanelError> {
        let id = id.to_string();
        self.request(|respond_to| EngineMessage::SetWindowSize { id, width, height, respond_to })
            .await?
    }

    // ========================================================================
    // Popovers
    // ========================================================================

    /// Opens a popover (or toggles it closed if already open).
    ///
    /// # Errors
    ///
    /// `DuplicateId` when the id belongs to a non-popover window,
    /// `NoDisplays`, or `NativePanelUnavailable`.
    pub async fn open_popover(
        &self,
        request: OpenPopoverRequest,
    ) -> Result<OpenedPopover, PanelError> {
        self.request(|respond_to| EngineMessage::OpenPopover { request, respond_to }).await?
    }

    /// Closes a popover. Missing ids are a no-op.
    ///
    /// # Errors
    ///
    /// Transport failures only.
    pub async fn close_popover(&self, id: &str) -> Result<(), PanelError> {
        let id = id.to_string();
        self.request(|respond_to| EngineMessage::ClosePopover { id, respond_to }).await?;
        Ok(())
    }

    /// Closes every open popover.
    ///
    /// # Errors
    ///
    /// Transport failures only.
    pub async fn close_all_popovers(&self) -> Result<(), PanelError> {
        self.request(|respond_to| EngineMessage::CloseAllPopovers { respond_to }).await?;
        Ok(())
    }

    /// Ids of currently open popovers.
    ///
    /// # Errors
    ///
    /// Transport failures only.
    pub async fn get_open_popovers(&self) -> Result<Vec<String>, PanelError> {
        Ok(self.request(|respond_to| EngineMessage::GetOpenPopovers { respond_to }).await?)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// The current monitor snapshot, primary first.
    ///
    /// # Errors
    ///
    /// `NoDisplays` before the first snapshot.
    pub async fn get_monitors(&self) -> Result<Vec<Monitor>, PanelError> {
        self.request(|respond_to| EngineMessage::GetMonitors { respond_to }).await?
    }

    /// Ids of live inline windows.
    ///
    /// # Errors
    ///
    /// Transport failures only.
    pub async fn list_windows(&self) -> Result<Vec<String>, PanelError> {
        Ok(self.request(|respond_to| EngineMessage::ListWindows { respond_to }).await?)
    }

    // ========================================================================
    // Plumbing
    // ========================================================================

    /// Injects a platform event, as a backend sink would.
    ///
    /// # Errors
    ///
    /// [`EngineError::SendFailed`] if the engine stopped.
    pub async fn inject_platform_event(&self, event: PlatformEvent) -> Result<(), EngineError> {
        self.sender
            .send(EngineMessage::Platform(event))
            .await
            .map_err(|_| EngineError::SendFailed)
    }

    /// Requests engine shutdown.
    ///
    /// # Errors
    ///
    /// [`EngineError::SendFailed`] if the engine already stopped.
    pub async fn shutdown(&self) -> Result<(), EngineError> {
        self.sender
            .send(EngineMessage::Shutdown)
            .await
            .map_err(|_| EngineError::SendFailed)
    }

    /// Whether the engine is still running.
    #[must_use]
    pub fn is_alive(&self) -> bool { !self.sender.is_closed() }
}

impl std::fmt::Debug for EngineHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineHandle").field("alive", &self.is_alive()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_handle_closed_detection() {
        let (tx, rx) = mpsc::channel(16);
        let handle = EngineHandle::new(tx);
        assert!(handle.is_alive());

        drop(rx);
        assert!(!handle.is_alive());
    }

    #[tokio::test]
    async fn test_request_against_stopped_engine_is_ipc_error() {
        let (tx, rx) = mpsc::channel(16);
        let handle = EngineHandle::new(tx);
        drop(rx);

        let result = handle.show_window("bar").await;
        assert!(matches!(result, Err(PanelError::Ipc(_))));
    }
}
