//! Centralized event definitions for the broadcast bus.
//!
//! All events delivered to child windows are defined here to keep the wire
//! names consistent in one place.
//!
//! ## Naming Convention
//!
//! All events follow the pattern: `pelmet://<module>/<event-name>`
//!
//! - `pelmet://` - Prefix identifying this as a Pelmet event
//! - `<module>` - The module that owns the event (e.g., `monitors`, `popover`)
//! - `<event-name>` - Descriptive kebab-case name for the event

/// Monitor-related events.
pub mod monitors {
    /// Emitted after a coalesced display topology change.
    ///
    /// Payload: the new monitor snapshot, primary first.
    pub const TOPOLOGY_CHANGED: &str = "pelmet://monitors/topology-changed";
}

/// Popover lifecycle events.
pub mod popover {
    /// Emitted exactly once whenever a popover leaves the open state,
    /// regardless of whether it was dismissed by blur, closed explicitly,
    /// toggled, or displaced by an exclusive-group member.
    ///
    /// Payload: `String` - the popover id.
    pub const CLOSED: &str = "pelmet://popover/closed";
}

/// Externally injected events, forwarded verbatim from the IPC socket.
pub mod external {
    /// Namespace prefix for external events.
    pub const PREFIX: &str = "pelmet://external/";

    /// Returns the bus name for an externally injected event.
    #[must_use]
    pub fn name(event: &str) -> String { format!("{PREFIX}{event}") }
}
