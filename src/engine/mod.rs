//! The engine actor.
//!
//! The engine owns the platform backend, the monitor snapshot, and the window
//! and popover registries, and processes messages one at a time. This stands
//! in for the platform's UI thread: every native operation happens here, so
//! operations against the same id serialize in issue order and topology
//! changes never interleave with an in-flight create.
//!
//! # Panic Recovery
//!
//! Each message handler runs under `catch_unwind`. A panicking handler drops
//! its reply channel (the caller sees a transport error), the panic is
//! logged, and the loop continues.

mod bus;
mod handle;
pub(crate) mod handlers;
mod messages;
mod state;

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

pub use bus::{EngineEvent, EventBus, Subscription};
pub use handle::{EngineError, EngineHandle};
pub use messages::EngineMessage;

use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::constants::channel::ENGINE_BUFFER_SIZE;
use crate::constants::timing::MONITOR_COALESCE_MS;
use crate::constants::DEFAULT_ORIGIN;
use crate::monitor::{Coalescer, MonitorRegistry};
use crate::platform::{PlatformBackend, PlatformEvent};
use crate::windows::WindowRegistry;
use state::EngineState;

/// Spawn-time engine configuration.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Origin prepended to default child URLs.
    pub origin: String,
    /// Focus the inline window under the cursor as it moves.
    pub hover_focus: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            hover_focus: false,
        }
    }
}

/// The engine actor.
pub struct Engine {
    state: EngineState,
    receiver: mpsc::Receiver<EngineMessage>,
    platform_rx: mpsc::UnboundedReceiver<PlatformEvent>,
    /// Keeps the platform channel open even if the backend drops its sink.
    _platform_tx: mpsc::UnboundedSender<PlatformEvent>,
    coalescer: Coalescer,
}

impl Engine {
    /// Spawns the engine on the current tokio runtime.
    ///
    /// Takes the initial monitor snapshot, registers the coordinator's own
    /// surface, and returns the request handle plus the event bus.
    pub fn spawn(
        backend: impl PlatformBackend + 'static,
        options: EngineOptions,
    ) -> (EngineHandle, EventBus) {
        let (sender, receiver) = mpsc::channel(ENGINE_BUFFER_SIZE);
        let (platform_tx, platform_rx) = mpsc::unbounded_channel();

        let mut backend: Box<dyn PlatformBackend> = Box::new(backend);
        backend.set_event_sink(platform_tx.clone());
        tracing::debug!(backend = backend.name(), "spawning engine");

        let bus = EventBus::new();
        let mut state = EngineState {
            backend,
            monitors: MonitorRegistry::new(),
            windows: WindowRegistry::new(),
            popovers: std::collections::HashMap::new(),
            bus: bus.clone(),
            origin: options.origin,
            hover_focus: options.hover_focus,
            last_hover: None,
        };

        match state.backend.monitors() {
            Ok(monitors) => state.monitors.ingest(monitors),
            Err(err) => {
                tracing::warn!(error = %err, "no initial monitor snapshot, queries fail until the first topology change");
            }
        }
        state.adopt_coordinator();

        let engine = Self {
            state,
            receiver,
            platform_rx,
            _platform_tx: platform_tx,
            coalescer: Coalescer::new(Duration::from_millis(MONITOR_COALESCE_MS)),
        };
        tokio::spawn(engine.run());

        (EngineHandle::new(sender), bus)
    }

    /// The actor's message loop.
    async fn run(mut self) {
        tracing::trace!("engine message loop starting");

        loop {
            let deadline = self.coalescer.deadline();
            tokio::select! {
                maybe_msg = self.receiver.recv() => {
                    match maybe_msg {
                        Some(EngineMessage::Shutdown) => {
                            tracing::debug!("engine received shutdown message");
                            break;
                        }
                        Some(msg) => self.dispatch(msg),
                        None => {
                            tracing::debug!("engine channel closed, exiting");
                            break;
                        }
                    }
                }
                Some(event) = self.platform_rx.recv() => {
                    self.handle_platform(event);
                }
                () = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.coalescer.disarm();
                    handlers::topology::on_topology_flush(&mut self.state);
                }
            }
        }
    }

    /// Handles one message under panic recovery.
    fn dispatch(&mut self, msg: EngineMessage) {
        let msg_name = msg.name();
        let result = catch_unwind(AssertUnwindSafe(|| {
            self.handle_message(msg);
        }));

        if let Err(panic_info) = result {
            let panic_msg = panic_info
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| panic_info.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            tracing::error!("PANIC in engine while handling '{msg_name}': {panic_msg}");
        }
    }

    fn handle_message(&mut self, msg: EngineMessage) {
        let state = &mut self.state;
        match msg {
            EngineMessage::CreateInlineWindow { id, url, position, config, respond_to } => {
                let _ = respond_to.send(handlers::windows::on_create_inline_window(
                    state, id, url, position, config,
                ));
            }
            EngineMessage::UpdateWindowPosition { id, position, respond_to } => {
                let _ = respond_to
                    .send(handlers::windows::on_update_window_position(state, &id, position));
            }
            EngineMessage::ShowWindow { id, respond_to } => {
                let _ = respond_to.send(handlers::windows::on_show_window(state, &id));
            }
            EngineMessage::HideWindow { id, respond_to } => {
                let _ = respond_to.send(handlers::windows::on_hide_window(state, &id));
            }
            EngineMessage::CloseWindow { id, idempotent, respond_to } => {
                let _ = respond_to.send(handlers::windows::on_close_window(state, &id, idempotent));
            }
            EngineMessage::SetWindowSize { id, width, height, respond_to } => {
                let _ = respond_to
                    .send(handlers::windows::on_set_window_size(state, &id, width, height));
            }
            EngineMessage::OpenPopover { request, respond_to } => {
                let _ = respond_to.send(handlers::popovers::on_open_popover(state, request));
            }
            EngineMessage::ClosePopover { id, respond_to } => {
                handlers::popovers::close_popover(state, &id);
                let _ = respond_to.send(());
            }
            EngineMessage::CloseAllPopovers { respond_to } => {
                handlers::popovers::on_close_all_popovers(state);
                let _ = respond_to.send(());
            }
            EngineMessage::GetMonitors { respond_to } => {
                let _ = respond_to.send(state.monitors.list());
            }
            EngineMessage::ListWindows { respond_to } => {
                let _ = respond_to
                    .send(state.windows.ids_with_role(crate::windows::WindowRole::InlineWindow));
            }
            EngineMessage::GetOpenPopovers { respond_to } => {
                let _ = respond_to.send(handlers::popovers::open_popover_ids(state));
            }
            EngineMessage::Platform(event) => self.handle_platform_inner(event),
            EngineMessage::Shutdown => unreachable!("handled in run()"),
        }
    }

    fn handle_platform(&mut self, event: PlatformEvent) {
        let result = catch_unwind(AssertUnwindSafe(|| {
            self.handle_platform_inner(event);
        }));
        if result.is_err() {
            tracing::error!("PANIC in engine while handling a platform event");
        }
    }

    fn handle_platform_inner(&mut self, event: PlatformEvent) {
        match event {
            PlatformEvent::DisplaysChanged => {
                // One timer slot, re-armed on every notification; the flush
                // runs once the burst goes quiet.
                self.coalescer.arm();
            }
            PlatformEvent::PanelBlurred { label } => {
                handlers::popovers::on_panel_blurred(&mut self.state, &label);
            }
            PlatformEvent::CursorMoved { x, y } => {
                handlers::windows::on_cursor_moved(&mut self.state, x, y);
            }
        }
    }
}
