//! Event ordering for the simulation queue.

use std::time::Duration;
use timeboost_core::Event;

/// Key for ordering events in the simulation queue.
///
/// Events are ordered by:
/// 1. Time (earlier first)
/// 2. Priority (lifecycle and commands before timers, see [`Event::priority`])
/// 3. Sequence (insertion order, for FIFO among equal keys)
///
/// The sequence number is unique per runner, so no two keys compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventKey {
    /// Simulation time the event is due.
    pub time: Duration,
    /// Same-instant ordering.
    pub priority: u8,
    /// Insertion order.
    pub sequence: u64,
}

impl EventKey {
    /// Key for `event` due at `time`.
    pub fn new(time: Duration, event: &Event, sequence: u64) -> Self {
        Self {
            time,
            priority: event.priority(),
            sequence,
        }
    }
}
