//! macOS surface backend.
//!
//! Windows are borderless `NSWindow`s; popovers are `NSPanel`s with the
//! non-activating style so opening one never steals focus from the active
//! application. Blur is observed through `NSWindowDidResignKeyNotification`
//! and relayed into the engine's mailbox, so dismissal serializes with
//! commands.
//!
//! AppKit is main-thread-only. The engine task must run on the process's
//! main run loop; every entry point checks for the main thread and fails
//! with a native error otherwise.
//!
//! Coordinates: the engine speaks top-left-origin virtual-desktop logical
//! pixels; AppKit speaks bottom-left. Conversion pivots on the primary
//! screen's height, the same convention the rest of the desktop uses.

use std::collections::HashMap;

use objc2::rc::Retained;
use objc2::runtime::AnyObject;
use objc2::{MainThreadMarker, class, msg_send};
use objc2_app_kit::{
    NSBackingStoreType, NSColor, NSEvent, NSEventMask, NSFloatingWindowLevel, NSPanel, NSScreen,
    NSWindow, NSWindowCollectionBehavior, NSWindowStyleMask,
};
use objc2_foundation::{NSNotificationCenter, NSPoint, NSRect, NSSize, NSString};
use tokio::sync::mpsc;

use super::{PlatformBackend, PlatformEvent};
use crate::error::PanelError;
use crate::geometry::Rect;
use crate::monitor::{Monitor, watcher};
use crate::windows::WindowConfig;

/// One realized surface and its observer tokens.
struct NativeSurface {
    window: Retained<NSWindow>,
    blur_observer: Option<Retained<AnyObject>>,
}

/// The AppKit-backed surface store.
pub struct MacosBackend {
    surfaces: HashMap<String, NativeSurface>,
    sink: Option<mpsc::UnboundedSender<PlatformEvent>>,
    watcher_started: bool,
    mouse_monitor_started: bool,
}

impl MacosBackend {
    /// Creates the backend. Surfaces are realized lazily per call.
    #[must_use]
    pub fn new() -> Self {
        Self {
            surfaces: HashMap::new(),
            sink: None,
            watcher_started: false,
            mouse_monitor_started: false,
        }
    }

    fn main_thread(&self) -> Result<MainThreadMarker, PanelError> {
        MainThreadMarker::new().ok_or_else(|| {
            PanelError::NativePanelUnavailable("not on the main thread".to_string())
        })
    }

    fn surface(&self, label: &str) -> Result<&NativeSurface, PanelError> {
        self.surfaces
            .get(label)
            .ok_or_else(|| PanelError::NotFound(label.to_string()))
    }

    /// Height of the primary screen, the pivot for coordinate flips.
    fn primary_height(mtm: MainThreadMarker) -> f64 {
        NSScreen::screens(mtm)
            .iter()
            .next()
            .map_or(0.0, |screen| screen.frame().size.height)
    }

    /// Converts a top-left-origin logical rect to an AppKit frame.
    fn to_ns_rect(mtm: MainThreadMarker, rect: Rect) -> NSRect {
        let primary_height = Self::primary_height(mtm);
        NSRect::new(
            NSPoint::new(rect.x, primary_height - rect.y - rect.height),
            NSSize::new(rect.width, rect.height),
        )
    }

    fn apply_common_flags(window: &NSWindow, config: &WindowConfig, mtm: MainThreadMarker) {
        window.setOpaque(false);
        window.setHasShadow(false);
        if config.transparent {
            unsafe { window.setBackgroundColor(Some(&NSColor::clearColor())) };
        }
        if config.always_on_top {
            window.setLevel(unsafe { NSFloatingWindowLevel });
        }
        window.setIgnoresMouseEvents(config.click_through);
        window.setCollectionBehavior(
            NSWindowCollectionBehavior::CanJoinAllSpaces
                | NSWindowCollectionBehavior::Stationary,
        );
        // AppKit would otherwise free the window on close and leave the
        // Retained pointing at a dead object.
        window.setReleasedWhenClosed(false);
        let _ = mtm;
    }

    fn register_blur_observer(
        &mut self,
        label: &str,
        window: &NSWindow,
    ) -> Option<Retained<AnyObject>> {
        let sink = self.sink.clone()?;
        let label = label.to_string();

        unsafe {
            let center = NSNotificationCenter::defaultCenter();
            let name = NSString::from_str("NSWindowDidResignKeyNotification");
            let block = block2::RcBlock::new(move |_notification: *mut AnyObject| {
                let _ = sink.send(PlatformEvent::PanelBlurred { label: label.clone() });
            });
            let observer: Retained<AnyObject> = msg_send![
                &*center,
                addObserverForName: &*name,
                object: window,
                queue: std::ptr::null_mut::<AnyObject>(),
                usingBlock: &*block
            ];
            Some(observer)
        }
    }

    fn start_mouse_monitor(&mut self, mtm: MainThreadMarker) {
        if self.mouse_monitor_started {
            return;
        }
        let Some(sink) = self.sink.clone() else { return };
        self.mouse_monitor_started = true;

        unsafe {
            let primary_height = Self::primary_height(mtm);
            let block = block2::RcBlock::new(move |_event: *mut AnyObject| {
                let location: NSPoint = NSEvent::mouseLocation();
                let _ = sink.send(PlatformEvent::CursorMoved {
                    x: location.x,
                    y: primary_height - location.y,
                });
            });
            let monitor: Option<Retained<AnyObject>> = msg_send![
                class!(NSEvent),
                addGlobalMonitorForEventsMatchingMask: NSEventMask::MouseMoved.0,
                handler: &*block
            ];
            // The monitor lives for the process lifetime.
            if let Some(monitor) = monitor {
                std::mem::forget(monitor);
            }
        }
    }
}

impl Default for MacosBackend {
    fn default() -> Self { Self::new() }
}

impl PlatformBackend for MacosBackend {
    fn name(&self) -> &'static str { "macos" }

    fn set_event_sink(&mut self, sink: mpsc::UnboundedSender<PlatformEvent>) {
        if !self.watcher_started {
            watcher::init_display_watcher(sink.clone());
            self.watcher_started = true;
        }
        self.sink = Some(sink);
        if let Some(mtm) = MainThreadMarker::new() {
            self.start_mouse_monitor(mtm);
        }
    }

    fn monitors(&mut self) -> Result<Vec<Monitor>, PanelError> {
        let mtm = self.main_thread()?;
        let screens = NSScreen::screens(mtm);
        if screens.is_empty() {
            return Err(PanelError::NoDisplays);
        }

        let primary_height = Self::primary_height(mtm);
        let monitors = screens
            .iter()
            .enumerate()
            .map(|(index, screen)| {
                let frame = screen.frame();
                let id: u32 = unsafe {
                    let description = screen.deviceDescription();
                    let key = NSString::from_str("NSScreenNumber");
                    let number: *mut AnyObject = msg_send![&*description, objectForKey: &*key];
                    if number.is_null() {
                        index as u32
                    } else {
                        msg_send![number, unsignedIntValue]
                    }
                };
                Monitor {
                    id,
                    name: screen.localizedName().to_string(),
                    width: frame.size.width,
                    height: frame.size.height,
                    x: frame.origin.x,
                    // Flip from AppKit's bottom-left origin.
                    y: primary_height - frame.origin.y - frame.size.height,
                    scale_factor: screen.backingScaleFactor(),
                    primary: index == 0,
                }
            })
            .collect();
        Ok(monitors)
    }

    fn create_window(
        &mut self,
        label: &str,
        _url: &str,
        rect: Rect,
        config: &WindowConfig,
    ) -> Result<(), PanelError> {
        let mtm = self.main_thread()?;
        let frame = Self::to_ns_rect(mtm, rect);

        let mut style = NSWindowStyleMask::Borderless;
        if config.resizable {
            style |= NSWindowStyleMask::Resizable;
        }
        if config.decorations {
            style |= NSWindowStyleMask::Titled;
        }

        let window = unsafe {
            NSWindow::initWithContentRect_styleMask_backing_defer(
                mtm.alloc(),
                frame,
                style,
                NSBackingStoreType::Buffered,
                false,
            )
        };
        Self::apply_common_flags(&window, config, mtm);
        window.orderFrontRegardless();

        self.surfaces.insert(
            label.to_string(),
            NativeSurface { window, blur_observer: None },
        );
        Ok(())
    }

    fn create_panel(&mut self, label: &str, _url: &str, rect: Rect) -> Result<(), PanelError> {
        let mtm = self.main_thread()?;
        let frame = Self::to_ns_rect(mtm, rect);
        let style = NSWindowStyleMask::Borderless | NSWindowStyleMask::NonactivatingPanel;

        let panel: Retained<NSPanel> = unsafe {
            NSPanel::initWithContentRect_styleMask_backing_defer(
                mtm.alloc(),
                frame,
                style,
                NSBackingStoreType::Buffered,
                false,
            )
        };
        panel.setFloatingPanel(true);
        unsafe { panel.setBecomesKeyOnlyIfNeeded(false) };

        let config = WindowConfig::default();
        Self::apply_common_flags(&panel, &config, mtm);

        // Show without activating the app that owns the anchor.
        panel.orderFrontRegardless();

        let window: Retained<NSWindow> = Retained::into_super(panel);
        let blur_observer = self.register_blur_observer(label, &window);
        self.surfaces.insert(
            label.to_string(),
            NativeSurface { window, blur_observer },
        );
        Ok(())
    }

    fn move_window(&mut self, label: &str, x: f64, y: f64) -> Result<(), PanelError> {
        let mtm = self.main_thread()?;
        let surface = self.surface(label)?;
        let height = surface.window.frame().size.height;
        let primary_height = Self::primary_height(mtm);
        surface
            .window
            .setFrameOrigin(NSPoint::new(x, primary_height - y - height));
        Ok(())
    }

    fn resize_window(&mut self, label: &str, width: f64, height: f64) -> Result<(), PanelError> {
        let mtm = self.main_thread()?;
        let surface = self.surface(label)?;
        // Keep the top edge where it is: AppKit resizes grow downward from
        // the bottom-left origin, our contract grows downward from top-left.
        let frame = surface.window.frame();
        let top = frame.origin.y + frame.size.height;
        let new_frame = NSRect::new(
            NSPoint::new(frame.origin.x, top - height),
            NSSize::new(width, height),
        );
        surface.window.setFrame_display(new_frame, true);
        let _ = mtm;
        Ok(())
    }

    fn show_window(&mut self, label: &str) -> Result<(), PanelError> {
        let _ = self.main_thread()?;
        self.surface(label)?.window.orderFrontRegardless();
        Ok(())
    }

    fn hide_window(&mut self, label: &str) -> Result<(), PanelError> {
        let _ = self.main_thread()?;
        let surface = self.surface(label)?;
        unsafe { surface.window.orderOut(None) };
        Ok(())
    }

    fn close_window(&mut self, label: &str) -> Result<(), PanelError> {
        let _ = self.main_thread()?;
        let surface = self
            .surfaces
            .remove(label)
            .ok_or_else(|| PanelError::NotFound(label.to_string()))?;
        if let Some(observer) = surface.blur_observer {
            unsafe {
                let center = NSNotificationCenter::defaultCenter();
                let () = msg_send![&*center, removeObserver: &*observer];
            }
        }
        surface.window.close();
        Ok(())
    }

    fn focus_window(&mut self, label: &str) -> Result<(), PanelError> {
        let _ = self.main_thread()?;
        self.surface(label)?.window.makeKeyAndOrderFront(None);
        Ok(())
    }

    fn set_click_through(&mut self, label: &str, ignore: bool) -> Result<(), PanelError> {
        let _ = self.main_thread()?;
        self.surface(label)?.window.setIgnoresMouseEvents(ignore);
        Ok(())
    }
}
