//! Deadline-slot coalescing for display reconfiguration bursts.
//!
//! macOS delivers several reconfiguration callbacks for a single physical
//! change (connect, mode set, scale set). The coalescer holds a single
//! deadline that is overwritten on every arrival; the engine's select loop
//! sleeps until the deadline and flushes once it passes, so a burst produces
//! exactly one downstream topology event carrying the final state.

use std::time::Duration;

use tokio::time::Instant;

/// A single re-armable deadline.
#[derive(Debug)]
pub struct Coalescer {
    deadline: Option<Instant>,
    window: Duration,
}

impl Coalescer {
    /// Creates a coalescer with the given quiet window.
    #[must_use]
    pub const fn new(window: Duration) -> Self { Self { deadline: None, window } }

    /// Arms (or re-arms) the deadline to `now + window`.
    pub fn arm(&mut self) { self.deadline = Some(Instant::now() + self.window); }

    /// The pending deadline, if armed.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> { self.deadline }

    /// Whether a flush is pending.
    #[must_use]
    pub const fn is_armed(&self) -> bool { self.deadline.is_some() }

    /// Clears the deadline, returning whether one was pending.
    pub fn disarm(&mut self) -> bool { self.deadline.take().is_some() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_disarmed() {
        let coalescer = Coalescer::new(Duration::from_millis(150));
        assert!(!coalescer.is_armed());
        assert!(coalescer.deadline().is_none());
    }

    #[test]
    fn test_arm_sets_deadline_in_the_future() {
        let mut coalescer = Coalescer::new(Duration::from_millis(150));
        coalescer.arm();
        assert!(coalescer.is_armed());
        assert!(coalescer.deadline().unwrap() > Instant::now());
    }

    #[test]
    fn test_rearm_overwrites_deadline() {
        let mut coalescer = Coalescer::new(Duration::from_millis(150));
        coalescer.arm();
        let first = coalescer.deadline().unwrap();
        std::thread::sleep(Duration::from_millis(5));
        coalescer.arm();
        assert!(coalescer.deadline().unwrap() > first);
    }

    #[test]
    fn test_disarm_reports_pending_state() {
        let mut coalescer = Coalescer::new(Duration::from_millis(150));
        assert!(!coalescer.disarm());
        coalescer.arm();
        assert!(coalescer.disarm());
        assert!(!coalescer.is_armed());
    }
}
