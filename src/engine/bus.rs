//! Broadcast bus for engine events.
//!
//! Subscribers register a callback and hold the returned [`Subscription`];
//! dropping it tears the registration down, so no manual counters are needed.
//! Events carry owned snapshots, never references into engine state, so a
//! callback can stash them without touching the engine.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::events;
use crate::monitor::Monitor;

/// An event fanned out to subscribers.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// The display topology changed; carries the new snapshot, primary first.
    MonitorTopologyChanged(Vec<Monitor>),
    /// A popover left the open state. Emitted exactly once per transition.
    PopoverClosed(String),
    /// An event injected from outside the process, forwarded verbatim.
    External { name: String, args: Vec<String> },
}

impl EngineEvent {
    /// The wire name children subscribe to.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::MonitorTopologyChanged(_) => events::monitors::TOPOLOGY_CHANGED.to_string(),
            Self::PopoverClosed(_) => events::popover::CLOSED.to_string(),
            Self::External { name, .. } => events::external::name(name),
        }
    }
}

type Callback = Arc<dyn Fn(&EngineEvent) + Send + Sync>;

#[derive(Default)]
struct Inner {
    subscribers: Mutex<HashMap<u64, Callback>>,
    next_id: AtomicU64,
}

/// Cloneable handle to the broadcast bus.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<Inner>,
}

/// A live registration. Dropping it unsubscribes.
pub struct Subscription {
    id: u64,
    inner: Weak<Inner>,
}

impl EventBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Registers a callback for every event.
    ///
    /// Callbacks may run on any thread that emits; they must not block for
    /// long and must not re-enter the engine synchronously.
    pub fn subscribe(
        &self,
        callback: impl Fn(&EngineEvent) + Send + Sync + 'static,
    ) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.subscribers.lock().insert(id, Arc::new(callback));
        Subscription { id, inner: Arc::downgrade(&self.inner) }
    }

    /// Delivers an event to every live subscriber.
    ///
    /// The subscriber table is copied before dispatch so callbacks can
    /// subscribe or unsubscribe without deadlocking.
    pub fn emit(&self, event: &EngineEvent) {
        let callbacks: Vec<Callback> = self.inner.subscribers.lock().values().cloned().collect();
        for callback in callbacks {
            callback(event);
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize { self.inner.subscribers.lock().len() }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.subscribers.lock().remove(&self.id);
        }
    }
}
