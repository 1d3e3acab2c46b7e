//! State owned by the engine actor.

use std::collections::HashMap;

use super::bus::EventBus;
use crate::constants::COORDINATOR_LABEL;
use crate::geometry::Rect;
use crate::monitor::MonitorRegistry;
use crate::platform::PlatformBackend;
use crate::popover::PopoverRecord;
use crate::windows::{WindowConfig, WindowRecord, WindowRegistry, WindowRole, WindowStatus};

/// Everything the engine task owns.
///
/// Nothing in here is shared; handlers take `&mut EngineState` and the actor
/// processes one message at a time.
pub(crate) struct EngineState {
    pub backend: Box<dyn PlatformBackend>,
    pub monitors: MonitorRegistry,
    pub windows: WindowRegistry,
    pub popovers: HashMap<String, PopoverRecord>,
    pub bus: EventBus,
    /// Origin prepended to default child URLs.
    pub origin: String,
    /// Whether cursor movement focuses the inline window underneath.
    pub hover_focus: bool,
    /// Label last focused by hover, to avoid re-focus storms.
    pub last_hover: Option<String>,
}

impl EngineState {
    /// Registers the coordinator's own surface.
    ///
    /// The coordinator record exists for the whole process lifetime; its
    /// surface covers the primary monitor so child-less applications still
    /// have somewhere to render.
    pub fn adopt_coordinator(&mut self) {
        let rect = self
            .monitors
            .primary()
            .map(|monitor| monitor.rect())
            .unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0));

        let config = WindowConfig::default();
        let record = WindowRecord {
            id: COORDINATOR_LABEL.to_string(),
            label: COORDINATOR_LABEL.to_string(),
            role: WindowRole::Coordinator,
            rect,
            status: WindowStatus::Visible,
            position: None,
            config,
        };

        if self.windows.insert(record).is_err() {
            // Spawn inserts into a fresh registry; a duplicate here means
            // spawn ran twice on the same state.
            tracing::error!("coordinator record already present");
            return;
        }

        let origin = self.origin.clone();
        if let Err(err) = self.backend.create_window(COORDINATOR_LABEL, &origin, rect, &config) {
            tracing::warn!(error = %err, "coordinator surface not realized");
        }
    }

    /// The default URL loaded into an inline child window.
    #[must_use]
    pub fn inline_child_url(&self, id: &str) -> String {
        format!("{}?window={id}", self.origin)
    }

    /// The URL loaded into a popover child, carrying its height budget.
    #[must_use]
    pub fn popover_child_url(&self, id: &str, max_height: f64) -> String {
        format!("{}?popover={id}&max_height={}", self.origin, max_height as u64)
    }
}
