//! Child-side half of the popover contract.
//!
//! A popover child observes its own content size and reports it to the host,
//! which resizes the panel. The host clamps to the height budget it computed
//! at open time; the child uses the same budget to decide whether to render
//! its own scroll region.

use crate::context::RoleContext;
use crate::engine::EngineHandle;
use crate::error::PanelError;

/// Auto-size reporter for a popover child surface.
pub struct PopoverChild {
    id: String,
    max_height: Option<f64>,
    handle: EngineHandle,
    last_reported: Option<(f64, f64)>,
}

impl PopoverChild {
    /// Builds the reporter from the surface's context.
    ///
    /// Returns `None` when the context is not a popover.
    #[must_use]
    pub fn from_context(context: &RoleContext, handle: EngineHandle) -> Option<Self> {
        match context {
            RoleContext::Popover { id, max_height } => Some(Self {
                id: id.clone(),
                max_height: *max_height,
                handle,
                last_reported: None,
            }),
            _ => None,
        }
    }

    /// The popover id this child renders.
    #[must_use]
    pub fn id(&self) -> &str { &self.id }

    /// The host-computed height budget, when the spawn carried one.
    #[must_use]
    pub const fn max_height(&self) -> Option<f64> { self.max_height }

    /// Caps a content height to the budget.
    #[must_use]
    pub fn clamp_height(&self, height: f64) -> f64 {
        self.max_height.map_or(height, |max| height.min(max))
    }

    /// Whether content of the given height overflows the panel, in which
    /// case the child renders its own scroll region.
    #[must_use]
    pub fn needs_scroll(&self, content_height: f64) -> bool {
        self.max_height.is_some_and(|max| content_height > max)
    }

    /// Reports an observed content size.
    ///
    /// Repeated reports of the same size are dropped; the host clamps the
    /// height again on its side, so a stale local budget can never grow the
    /// panel past it.
    ///
    /// # Errors
    ///
    /// Whatever the engine's resize surfaces.
    pub async fn content_resized(&mut self, width: f64, height: f64) -> Result<(), PanelError> {
        let report = (width, self.clamp_height(height));
        if self.last_reported == Some(report) {
            return Ok(());
        }

        self.handle.set_window_size(&self.id, report.0, report.1).await?;
        self.last_reported = Some(report);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Engine, EngineOptions};
    use crate::geometry::Rect;
    use crate::platform::headless::HeadlessBackend;
    use crate::popover::OpenPopoverRequest;

    fn popover_context(max_height: Option<f64>) -> RoleContext {
        RoleContext::Popover { id: "media".to_string(), max_height }
    }

    #[tokio::test]
    async fn test_from_context_rejects_non_popover_roles() {
        let (backend, _remote) = HeadlessBackend::new();
        let (handle, _bus) = Engine::spawn(backend, EngineOptions::default());

        assert!(PopoverChild::from_context(&RoleContext::Coordinator, handle.clone()).is_none());
        assert!(
            PopoverChild::from_context(
                &RoleContext::InlineWindow { id: "bar".to_string() },
                handle
            )
            .is_none()
        );
    }

    #[tokio::test]
    async fn test_clamp_and_scroll_decision() {
        let (backend, _remote) = HeadlessBackend::new();
        let (handle, _bus) = Engine::spawn(backend, EngineOptions::default());
        let child = PopoverChild::from_context(&popover_context(Some(300.0)), handle).unwrap();

        assert_eq!(child.clamp_height(600.0), 300.0);
        assert_eq!(child.clamp_height(200.0), 200.0);
        assert!(child.needs_scroll(600.0));
        assert!(!child.needs_scroll(200.0));
    }

    #[tokio::test]
    async fn test_content_resized_dedups_and_resizes_panel() {
        let (backend, remote) = HeadlessBackend::new();
        let (handle, _bus) = Engine::spawn(backend, EngineOptions::default());

        handle
            .open_popover(OpenPopoverRequest {
                id: "media".to_string(),
                anchor: Rect::new(100.0, 40.0, 24.0, 24.0),
                width: 340.0,
                height: 100.0,
                align: crate::popover::PopoverAlign::Center,
                offset_y: 8.0,
                exclusive: crate::popover::Exclusive::No,
            })
            .await
            .unwrap();

        let context = popover_context(Some(300.0));
        let mut child = PopoverChild::from_context(&context, handle).unwrap();

        child.content_resized(400.0, 600.0).await.unwrap();
        let surface = remote.surface("popover-media").unwrap();
        assert_eq!(surface.rect.width, 400.0);
        assert_eq!(surface.rect.height, 300.0);

        // Same observed size again: no second resize op.
        let ops_before = remote.ops().len();
        child.content_resized(400.0, 600.0).await.unwrap();
        assert_eq!(remote.ops().len(), ops_before);
    }
}
