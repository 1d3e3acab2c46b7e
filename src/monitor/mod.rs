//! Monitor records and the monitor registry.
//!
//! The registry keeps the most recent display snapshot, ordered with the
//! primary monitor first and the rest by native display id ascending. It is
//! owned by the engine task; change notifications fan out through the engine's
//! event bus after coalescing (see [`coalescer`]).

mod coalescer;
#[cfg(target_os = "macos")]
pub mod watcher;

pub use coalescer::Coalescer;

use serde::{Deserialize, Serialize};

use crate::error::PanelError;
use crate::geometry::Rect;

/// A connected display, in virtual-desktop logical pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Monitor {
    /// Native display id; stable while the display stays connected.
    pub id: u32,
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub x: f64,
    pub y: f64,
    pub scale_factor: f64,
    /// Whether the platform designates this display as primary.
    pub primary: bool,
}

impl Monitor {
    /// The monitor's bounds as a rectangle.
    #[must_use]
    pub fn rect(&self) -> Rect { Rect::new(self.x, self.y, self.width, self.height) }
}

/// Snapshot store for the current display topology.
///
/// `None` until the first snapshot arrives; queries before that fail with
/// [`PanelError::NoDisplays`].
#[derive(Debug, Default)]
pub struct MonitorRegistry {
    snapshot: Option<Vec<Monitor>>,
}

impl MonitorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self { Self { snapshot: None } }

    /// Replaces the snapshot, normalizing the ordering: primary first, then
    /// native display id ascending.
    pub fn ingest(&mut self, mut monitors: Vec<Monitor>) {
        monitors.sort_by_key(|m| (!m.primary, m.id));
        self.snapshot = Some(monitors);
    }

    /// Returns the current snapshot.
    ///
    /// # Errors
    ///
    /// [`PanelError::NoDisplays`] before the first snapshot, or if the last
    /// snapshot was empty.
    pub fn list(&self) -> Result<Vec<Monitor>, PanelError> {
        match &self.snapshot {
            Some(monitors) if !monitors.is_empty() => Ok(monitors.clone()),
            _ => Err(PanelError::NoDisplays),
        }
    }

    /// Whether a snapshot has arrived.
    #[must_use]
    pub fn has_snapshot(&self) -> bool {
        self.snapshot.as_ref().is_some_and(|m| !m.is_empty())
    }

    /// The primary monitor, falling back to the first listed.
    ///
    /// # Errors
    ///
    /// [`PanelError::NoDisplays`] before the first snapshot.
    pub fn primary(&self) -> Result<Monitor, PanelError> {
        let monitors = self.list()?;
        Ok(monitors
            .iter()
            .find(|m| m.primary)
            .unwrap_or(&monitors[0])
            .clone())
    }

    /// Looks up a monitor by name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<Monitor> {
        self.snapshot
            .as_ref()?
            .iter()
            .find(|m| m.name == name)
            .cloned()
    }

    /// The monitor containing the given point, or the primary when no
    /// monitor contains it.
    ///
    /// # Errors
    ///
    /// [`PanelError::NoDisplays`] before the first snapshot.
    pub fn monitor_at(&self, x: f64, y: f64) -> Result<Monitor, PanelError> {
        let monitors = self.list()?;
        Ok(monitors
            .iter()
            .find(|m| m.rect().contains(x, y))
            .cloned()
            .unwrap_or(self.primary()?))
    }

    /// Whether a display with the given native id is present.
    #[must_use]
    pub fn contains_id(&self, id: u32) -> bool {
        self.snapshot
            .as_ref()
            .is_some_and(|monitors| monitors.iter().any(|m| m.id == id))
    }
}
