//! In-memory surface backend.
//!
//! Surfaces are plain records in a shared table. The paired
//! [`HeadlessRemote`] lets a test (or a non-macOS host) reshape the monitor
//! table, blur panels, and move the cursor, delivering the resulting
//! [`PlatformEvent`]s through the engine's sink exactly as a real platform
//! would.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use super::{PlatformBackend, PlatformEvent};
use crate::error::PanelError;
use crate::geometry::Rect;
use crate::monitor::Monitor;
use crate::windows::WindowConfig;

/// What kind of surface a record is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    Window,
    Panel,
}

/// A recorded surface.
#[derive(Debug, Clone)]
pub struct Surface {
    pub label: String,
    pub kind: SurfaceKind,
    pub url: String,
    pub rect: Rect,
    pub visible: bool,
    pub click_through: bool,
}

#[derive(Debug, Default)]
struct Shared {
    surfaces: Vec<Surface>,
    monitors: Vec<Monitor>,
    focused: Option<String>,
    /// Every mutating backend call, in order, for ordering assertions.
    ops: Vec<String>,
    sink: Option<mpsc::UnboundedSender<PlatformEvent>>,
    /// When set, the next surface creation fails with this message.
    fail_next_create: Option<String>,
}

impl Shared {
    fn surface_mut(&mut self, label: &str) -> Result<&mut Surface, PanelError> {
        self.surfaces
            .iter_mut()
            .find(|s| s.label == label)
            .ok_or_else(|| PanelError::NotFound(label.to_string()))
    }
}

/// The backend half, handed to the engine.
pub struct HeadlessBackend {
    shared: Arc<Mutex<Shared>>,
}

/// The control half, kept by the test or host.
#[derive(Clone)]
pub struct HeadlessRemote {
    shared: Arc<Mutex<Shared>>,
}

impl HeadlessBackend {
    /// Creates a backend with a single 1440x900 primary display.
    #[must_use]
    pub fn new() -> (Self, HeadlessRemote) {
        Self::with_monitors(vec![Monitor {
            id: 1,
            name: "headless".to_string(),
            width: 1440.0,
            height: 900.0,
            x: 0.0,
            y: 0.0,
            scale_factor: 1.0,
            primary: true,
        }])
    }

    /// Creates a backend with the given display table.
    #[must_use]
    pub fn with_monitors(monitors: Vec<Monitor>) -> (Self, HeadlessRemote) {
        let shared = Arc::new(Mutex::new(Shared {
            monitors,
            ..Shared::default()
        }));
        (
            Self { shared: Arc::clone(&shared) },
            HeadlessRemote { shared },
        )
    }
}

impl PlatformBackend for HeadlessBackend {
    fn name(&self) -> &'static str { "headless" }

    fn set_event_sink(&mut self, sink: mpsc::UnboundedSender<PlatformEvent>) {
        self.shared.lock().sink = Some(sink);
    }

    fn monitors(&mut self) -> Result<Vec<Monitor>, PanelError> {
        let monitors = self.shared.lock().monitors.clone();
        if monitors.is_empty() {
            return Err(PanelError::NoDisplays);
        }
        Ok(monitors)
    }

    fn create_window(
        &mut self,
        label: &str,
        url: &str,
        rect: Rect,
        config: &WindowConfig,
    ) -> Result<(), PanelError> {
        let mut shared = self.shared.lock();
        if let Some(reason) = shared.fail_next_create.take() {
            return Err(PanelError::NativeCreateFailed(reason));
        }
        shared.ops.push(format!("create_window {label}"));
        shared.surfaces.push(Surface {
            label: label.to_string(),
            kind: SurfaceKind::Window,
            url: url.to_string(),
            rect,
            visible: true,
            click_through: config.click_through,
        });
        Ok(())
    }

    fn create_panel(&mut self, label: &str, url: &str, rect: Rect) -> Result<(), PanelError> {
        let mut shared = self.shared.lock();
        if let Some(reason) = shared.fail_next_create.take() {
            return Err(PanelError::NativePanelUnavailable(reason));
        }
        shared.ops.push(format!("create_panel {label}"));
        shared.surfaces.push(Surface {
            label: label.to_string(),
            kind: SurfaceKind::Panel,
            url: url.to_string(),
            rect,
            visible: true,
            click_through: false,
        });
        Ok(())
    }

    fn move_window(&mut self, label: &str, x: f64, y: f64) -> Result<(), PanelError> {
        let mut shared = self.shared.lock();
        shared.ops.push(format!("move_window {label}"));
        let surface = shared.surface_mut(label)?;
        surface.rect.x = x;
        surface.rect.y = y;
        Ok(())
    }

    fn resize_window(&mut self, label: &str, width: f64, height: f64) -> Result<(), PanelError> {
        let mut shared = self.shared.lock();
        shared.ops.push(format!("resize_window {label}"));
        let surface = shared.surface_mut(label)?;
        surface.rect.width = width;
        surface.rect.height = height;
        Ok(())
    }

    fn show_window(&mut self, label: &str) -> Result<(), PanelError> {
        let mut shared = self.shared.lock();
        shared.ops.push(format!("show_window {label}"));
        shared.surface_mut(label)?.visible = true;
        Ok(())
    }

    fn hide_window(&mut self, label: &str) -> Result<(), PanelError> {
        let mut shared = self.shared.lock();
        shared.ops.push(format!("hide_window {label}"));
        shared.surface_mut(label)?.visible = false;
        Ok(())
    }

    fn close_window(&mut self, label: &str) -> Result<(), PanelError> {
        let mut shared = self.shared.lock();
        shared.ops.push(format!("close_window {label}"));
        let index = shared
            .surfaces
            .iter()
            .position(|s| s.label == label)
            .ok_or_else(|| PanelError::NotFound(label.to_string()))?;
        shared.surfaces.remove(index);
        if shared.focused.as_deref() == Some(label) {
            shared.focused = None;
        }
        Ok(())
    }

    fn focus_window(&mut self, label: &str) -> Result<(), PanelError> {
        let mut shared = self.shared.lock();
        shared.ops.push(format!("focus_window {label}"));
        shared.surface_mut(label)?;
        shared.focused = Some(label.to_string());
        Ok(())
    }

    fn set_click_through(&mut self, label: &str, ignore: bool) -> Result<(), PanelError> {
        let mut shared = self.shared.lock();
        shared.ops.push(format!("set_click_through {label} {ignore}"));
        shared.surface_mut(label)?.click_through = ignore;
        Ok(())
    }
}

impl HeadlessRemote {
    /// Replaces the monitor table and reports a reconfiguration.
    pub fn set_monitors(&self, monitors: Vec<Monitor>) {
        let sink = {
            let mut shared = self.shared.lock();
            shared.monitors = monitors;
            shared.sink.clone()
        };
        if let Some(sink) = sink {
            let _ = sink.send(PlatformEvent::DisplaysChanged);
        }
    }

    /// Reports a panel losing key status.
    pub fn blur(&self, label: &str) {
        if let Some(sink) = self.shared.lock().sink.clone() {
            let _ = sink.send(PlatformEvent::PanelBlurred { label: label.to_string() });
        }
    }

    /// Reports cursor movement.
    pub fn move_cursor(&self, x: f64, y: f64) {
        if let Some(sink) = self.shared.lock().sink.clone() {
            let _ = sink.send(PlatformEvent::CursorMoved { x, y });
        }
    }

    /// Makes the next surface creation fail with the given reason.
    pub fn fail_next_create(&self, reason: &str) {
        self.shared.lock().fail_next_create = Some(reason.to_string());
    }

    /// Snapshot of a surface by label.
    #[must_use]
    pub fn surface(&self, label: &str) -> Option<Surface> {
        self.shared.lock().surfaces.iter().find(|s| s.label == label).cloned()
    }

    /// Number of live surfaces.
    #[must_use]
    pub fn surface_count(&self) -> usize { self.shared.lock().surfaces.len() }

    /// Label of the focused surface, if any.
    #[must_use]
    pub fn focused(&self) -> Option<String> { self.shared.lock().focused.clone() }

    /// The ordered log of mutating backend calls.
    #[must_use]
    pub fn ops(&self) -> Vec<String> { self.shared.lock().ops.clone() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_close_surfaces() {
        let (mut backend, remote) = HeadlessBackend::new();

        backend
            .create_window(
                "inline-window-bar",
                "pelmet://localhost/?window=bar",
                Rect::new(0.0, 0.0, 100.0, 40.0),
                &WindowConfig::default(),
            )
            .unwrap();
        assert_eq!(remote.surface_count(), 1);
        assert!(remote.surface("inline-window-bar").unwrap().visible);

        backend.close_window("inline-window-bar").unwrap();
        assert_eq!(remote.surface_count(), 0);
    }

    #[test]
    fn test_unknown_label_is_not_found() {
        let (mut backend, _remote) = HeadlessBackend::new();
        assert!(matches!(
            backend.show_window("nope"),
            Err(PanelError::NotFound(_))
        ));
    }

    #[test]
    fn test_fail_next_create() {
        let (mut backend, remote) = HeadlessBackend::new();
        remote.fail_next_create("out of surfaces");

        let result = backend.create_window(
            "inline-window-bar",
            "",
            Rect::new(0.0, 0.0, 1.0, 1.0),
            &WindowConfig::default(),
        );
        assert!(matches!(result, Err(PanelError::NativeCreateFailed(_))));
        assert_eq!(remote.surface_count(), 0);

        // Only the next create fails.
        assert!(backend
            .create_window("inline-window-bar", "", Rect::new(0.0, 0.0, 1.0, 1.0), &WindowConfig::default())
            .is_ok());
    }

    #[test]
    fn test_remote_events_reach_sink() {
        let (mut backend, remote) = HeadlessBackend::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        backend.set_event_sink(tx);

        remote.blur("popover-media");
        remote.move_cursor(10.0, 20.0);
        remote.set_monitors(vec![]);

        assert_eq!(
            rx.try_recv().unwrap(),
            PlatformEvent::PanelBlurred { label: "popover-media".to_string() }
        );
        assert_eq!(rx.try_recv().unwrap(), PlatformEvent::CursorMoved { x: 10.0, y: 20.0 });
        assert_eq!(rx.try_recv().unwrap(), PlatformEvent::DisplaysChanged);
    }

    #[test]
    fn test_ops_are_logged_in_order() {
        let (mut backend, remote) = HeadlessBackend::new();
        backend
            .create_panel("popover-a", "", Rect::new(0.0, 0.0, 10.0, 10.0))
            .unwrap();
        backend.hide_window("popover-a").unwrap();
        backend.close_window("popover-a").unwrap();

        assert_eq!(
            remote.ops(),
            vec![
                "create_panel popover-a",
                "hide_window popover-a",
                "close_window popover-a"
            ]
        );
    }
}
