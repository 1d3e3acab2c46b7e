//! Display reconfiguration watcher (macOS).
//!
//! Registers a Core Graphics reconfiguration callback and forwards every
//! notification into the engine's platform event channel. The engine
//! coalesces; this thread just relays.

use std::os::raw::c_void;
use std::sync::mpsc::{Sender, channel};

use core_graphics::display::CGDisplayRegisterReconfigurationCallback;
use tokio::sync::mpsc::UnboundedSender;

use crate::platform::PlatformEvent;

/// Starts the watcher thread.
///
/// The registration lives for the process lifetime; there is no teardown.
pub fn init_display_watcher(sink: UnboundedSender<PlatformEvent>) {
    let spawned = std::thread::Builder::new()
        .name("pelmet-display-watcher".to_string())
        .spawn(move || {
            let (tx, rx) = channel();

            unsafe {
                extern "C" fn display_reconfiguration_callback(
                    _display: u32,
                    _flags: u32,
                    user_info: *const c_void,
                ) {
                    if !user_info.is_null() {
                        let tx = unsafe { &*user_info.cast::<Sender<()>>() };
                        let _ = tx.send(());
                    }
                }

                let tx_ptr: *const Sender<()> = Box::into_raw(Box::new(tx));

                CGDisplayRegisterReconfigurationCallback(
                    display_reconfiguration_callback,
                    tx_ptr.cast::<c_void>(),
                );
            }

            while rx.recv().is_ok() {
                if sink.send(PlatformEvent::DisplaysChanged).is_err() {
                    break;
                }
            }
        });

    if let Err(err) = spawned {
        tracing::error!(error = %err, "failed to spawn display watcher thread");
    }
}
