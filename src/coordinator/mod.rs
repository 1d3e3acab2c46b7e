//! The coordinator orchestrator.
//!
//! The orchestrator is the process-wide bookkeeping above the engine: it
//! knows which role this process plays, tracks which declared windows have
//! had their surfaces realized, and injects external events into the
//! broadcast bus for children to pick up by name. Repositioning after a
//! topology change happens inside the engine, where it serializes with
//! in-flight window operations; the orchestrator only ever talks through the
//! engine handle.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::constants::COORDINATOR_LABEL;
use crate::context::RoleContext;
use crate::engine::{EngineEvent, EngineHandle, EventBus, Subscription};
use crate::error::PanelError;
use crate::geometry::PositionDescriptor;
use crate::windows::WindowConfig;

struct Pending {
    ids: Mutex<HashSet<String>>,
    count_tx: watch::Sender<usize>,
    count_rx: watch::Receiver<usize>,
}

/// Process-wide coordination state.
pub struct Orchestrator {
    role: RoleContext,
    handle: EngineHandle,
    bus: EventBus,
    pending: Arc<Pending>,
}

impl Orchestrator {
    /// Creates an orchestrator for the given role.
    #[must_use]
    pub fn new(role: RoleContext, handle: EngineHandle, bus: EventBus) -> Self {
        let (count_tx, count_rx) = watch::channel(0);
        Self {
            role,
            handle,
            bus,
            pending: Arc::new(Pending {
                ids: Mutex::new(HashSet::new()),
                count_tx,
                count_rx,
            }),
        }
    }

    /// This process's role.
    #[must_use]
    pub const fn role(&self) -> &RoleContext { &self.role }

    /// The engine handle, for collaborators that need direct access.
    #[must_use]
    pub fn engine(&self) -> EngineHandle { self.handle.clone() }

    // ========================================================================
    // Declared windows
    // ========================================================================

    /// Marks a window id as declared but not yet realized.
    pub fn declare(&self, id: &str) {
        let mut ids = self.pending.ids.lock();
        ids.insert(id.to_string());
        let _ = self.pending.count_tx.send(ids.len());
    }

    /// Marks a declared window as realized.
    pub fn mark_ready(&self, id: &str) {
        let mut ids = self.pending.ids.lock();
        if ids.remove(id) {
            let _ = self.pending.count_tx.send(ids.len());
        }
    }

    /// Declares and creates an inline window in one step.
    ///
    /// The id stays pending until the surface is realized; a failed create
    /// leaves it pending, so [`wait_for_all`](Self::wait_for_all) keeps
    /// waiting and the application decides how to recover.
    ///
    /// # Errors
    ///
    /// Whatever the engine's create surfaces.
    pub async fn create_inline_window(
        &self,
        id: &str,
        url: Option<String>,
        position: PositionDescriptor,
        config: WindowConfig,
    ) -> Result<(), PanelError> {
        self.declare(id);
        self.handle.create_inline_window(id, url, position, config).await?;
        self.mark_ready(id);
        Ok(())
    }

    /// Number of declared windows whose surfaces are not yet realized.
    #[must_use]
    pub fn pending_count(&self) -> usize { self.pending.ids.lock().len() }

    /// Completes once every declared window has been realized.
    ///
    /// Never resolves while any declared window is stuck; callers impose
    /// their own timeout policy if they need one.
    pub async fn wait_for_all(&self) {
        let mut rx = self.pending.count_rx.clone();
        loop {
            if *rx.borrow_and_update() == 0 {
                return;
            }
            if rx.changed().await.is_err() {
                return;
            }
        }
    }

    /// Hides the coordinator's own surface.
    ///
    /// Used by applications that render everything through child windows.
    ///
    /// # Errors
    ///
    /// Whatever the engine's hide surfaces.
    pub async fn hide_self(&self) -> Result<(), PanelError> {
        self.handle.hide_window(COORDINATOR_LABEL).await
    }

    // ========================================================================
    // Broadcast
    // ========================================================================

    /// Injects an external event, broadcast to children verbatim.
    pub fn forward_external(&self, name: &str, args: Vec<String>) {
        tracing::debug!(name, "forwarding external event");
        self.bus.emit(&EngineEvent::External { name: name.to_string(), args });
    }

    /// Subscribes to every broadcast event.
    pub fn subscribe(
        &self,
        callback: impl Fn(&EngineEvent) + Send + Sync + 'static,
    ) -> Subscription {
        self.bus.subscribe(callback)
    }

    /// Subscribes to events with a specific wire name, the way children
    /// register interest.
    pub fn subscribe_named(
        &self,
        name: &str,
        callback: impl Fn(&EngineEvent) + Send + Sync + 'static,
    ) -> Subscription {
        let name = name.to_string();
        self.bus.subscribe(move |event| {
            if event.name() == name {
                callback(event);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::engine::{Engine, EngineOptions};
    use crate::platform::headless::HeadlessBackend;

    fn orchestrator() -> Orchestrator {
        let (backend, _remote) = HeadlessBackend::new();
        let (handle, bus) = Engine::spawn(backend, EngineOptions::default());
        Orchestrator::new(RoleContext::Coordinator, handle, bus)
    }

    #[tokio::test]
    async fn test_wait_for_all_completes_with_no_declarations() {
        let orchestrator = orchestrator();
        tokio::time::timeout(Duration::from_secs(1), orchestrator.wait_for_all())
            .await
            .expect("wait_for_all should resolve immediately");
    }

    #[tokio::test]
    async fn test_wait_for_all_blocks_on_pending_declaration() {
        let orchestrator = orchestrator();
        orchestrator.declare("bar");

        let waited =
            tokio::time::timeout(Duration::from_millis(50), orchestrator.wait_for_all()).await;
        assert!(waited.is_err(), "wait_for_all must not resolve while pending");

        orchestrator.mark_ready("bar");
        tokio::time::timeout(Duration::from_secs(1), orchestrator.wait_for_all())
            .await
            .expect("wait_for_all should resolve after mark_ready");
    }

    #[tokio::test]
    async fn test_create_inline_window_clears_pending() {
        let orchestrator = orchestrator();
        let position = PositionDescriptor {
            top: Some(0.0),
            left: Some(0.0),
            right: Some(0.0),
            height: Some(40.0),
            ..Default::default()
        };
        orchestrator
            .create_inline_window("bar", None, position, WindowConfig::default())
            .await
            .unwrap();

        assert_eq!(orchestrator.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_create_stays_pending() {
        let orchestrator = orchestrator();
        // Unresolvable: no horizontal fields at all.
        let position = PositionDescriptor {
            top: Some(0.0),
            height: Some(40.0),
            ..Default::default()
        };
        let result = orchestrator
            .create_inline_window("bar", None, position, WindowConfig::default())
            .await;

        assert!(result.is_err());
        assert_eq!(orchestrator.pending_count(), 1);
    }

    #[tokio::test]
    async fn test_external_events_reach_named_subscribers() {
        let orchestrator = orchestrator();
        let hits = Arc::new(AtomicUsize::new(0));

        let hits_clone = Arc::clone(&hits);
        let _subscription = orchestrator
            .subscribe_named("pelmet://external/workspace-changed", move |event| {
                if let EngineEvent::External { args, .. } = event {
                    assert_eq!(args, &vec!["coding".to_string()]);
                    hits_clone.fetch_add(1, Ordering::SeqCst);
                }
            });

        orchestrator.forward_external("workspace-changed", vec!["coding".to_string()]);
        orchestrator.forward_external("window-focus-changed", vec![]);

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
