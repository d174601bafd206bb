//! Simulation runner.

use crate::EventKey;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::time::Duration;
use timeboost_clock::RoundReader;
use timeboost_core::{Action, Event, Notification, StateMachine, TimerId};
use timeboost_node::{ConfigError, DashboardConfig, DashboardStateMachine, DashboardView};
use tracing::{debug, info, trace, warn};

/// Undrained notifications kept before the oldest are discarded.
pub const DEFAULT_NOTIFICATION_CAPACITY: usize = 16_384;

/// Statistics collected during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationStats {
    /// Events delivered to the dashboard.
    pub events_processed: u64,
    /// Timers armed (including replacements).
    pub timers_set: u64,
    /// Timers cancelled before firing.
    pub timers_cancelled: u64,
    /// Notifications published.
    pub notifications: u64,
    /// Notifications discarded because the log was full.
    pub notifications_dropped: u64,
}

/// Deterministic runner for the dashboard.
///
/// Owns time: a virtual clock that jumps straight to the next due event,
/// so a run covering hours of dashboard time completes in milliseconds.
/// Given the same configuration, seed and command sequence, every run
/// produces the same notifications and the same final view.
pub struct SimulationRunner {
    node: DashboardStateMachine,

    /// Pending events, ordered by (time, priority, sequence).
    queue: BTreeMap<EventKey, Event>,

    /// Live timers and the queue entry each one fires as.
    timers: HashMap<TimerId, EventKey>,

    /// Next queue sequence number.
    sequence: u64,

    /// Virtual time.
    now: Duration,

    /// Notifications published since the last drain, with their time.
    /// Bounded by `notification_capacity`; the oldest entry goes first.
    notifications: VecDeque<(Duration, Notification)>,

    notification_capacity: usize,

    stats: SimulationStats,

    shut_down: bool,
}

impl SimulationRunner {
    /// Create a runner. Nothing happens until [`start`](Self::start).
    pub fn new(config: DashboardConfig, seed: u64) -> Result<Self, ConfigError> {
        let node = DashboardStateMachine::new(config, seed)?;
        info!(seed, "Created simulation runner");
        Ok(Self {
            node,
            queue: BTreeMap::new(),
            timers: HashMap::new(),
            sequence: 0,
            now: Duration::ZERO,
            notifications: VecDeque::new(),
            notification_capacity: DEFAULT_NOTIFICATION_CAPACITY,
            stats: SimulationStats::default(),
            shut_down: false,
        })
    }

    /// Keep at most `capacity` undrained notifications.
    pub fn with_notification_capacity(mut self, capacity: usize) -> Self {
        self.notification_capacity = capacity.max(1);
        while self.notifications.len() > self.notification_capacity {
            self.notifications.pop_front();
            self.stats.notifications_dropped += 1;
        }
        self
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Accessors
    // ═══════════════════════════════════════════════════════════════════════════

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// The dashboard being driven.
    pub fn node(&self) -> &DashboardStateMachine {
        &self.node
    }

    /// Snapshot for the presentation layer.
    pub fn view(&self) -> DashboardView {
        self.node.view()
    }

    /// Read-only handle to the current round.
    ///
    /// The handle is detached once the runner is dropped.
    pub fn round_reader(&self) -> RoundReader {
        self.node.round_reader()
    }

    /// Notifications published since the last drain, oldest first.
    pub fn notifications(&self) -> &VecDeque<(Duration, Notification)> {
        &self.notifications
    }

    /// Take the notifications published since the last drain.
    pub fn drain_notifications(&mut self) -> Vec<(Duration, Notification)> {
        self.notifications.drain(..).collect()
    }

    /// Run statistics.
    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    /// Whether `id` is armed.
    pub fn is_timer_armed(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    /// Number of armed timers.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Time of the next due event, if any.
    pub fn next_event_time(&self) -> Option<Duration> {
        self.queue.keys().next().map(|key| key.time)
    }

    /// Whether the runner has been shut down.
    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Driving
    // ═══════════════════════════════════════════════════════════════════════════

    /// Bring the dashboard up at the current time.
    pub fn start(&mut self) {
        self.command(Event::Start);
    }

    /// Flip the pause flag at the current time.
    pub fn toggle_pause(&mut self) {
        self.command(Event::TogglePause);
    }

    /// Process every event due at or before `end`, then advance to `end`.
    pub fn run_until(&mut self, end: Duration) {
        while self.next_event_time().is_some_and(|time| time <= end) {
            self.step();
        }
        if end > self.now {
            self.now = end;
            self.node.set_time(end);
        }
    }

    /// Process the next event. Returns `false` if the queue was empty.
    pub fn step(&mut self) -> bool {
        let Some((key, event)) = self.queue.pop_first() else {
            return false;
        };

        // A fired timer is no longer armed
        self.timers.retain(|_, armed| *armed != key);

        self.now = key.time;
        self.node.set_time(self.now);
        trace!(time = ?self.now, event = event.type_name(), "Processing event");

        let actions = self.node.handle(event);
        self.stats.events_processed += 1;
        for action in actions {
            self.process_action(action);
        }
        true
    }

    /// Tear the dashboard down and cancel every pending timer.
    ///
    /// The runner is inert afterwards: commands and runs do nothing.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }

        let actions = self.node.handle(Event::Shutdown);
        for action in actions {
            self.process_action(action);
        }

        let orphaned = self.queue.len();
        self.queue.clear();
        self.timers.clear();
        self.shut_down = true;

        info!(
            time = ?self.now,
            events = self.stats.events_processed,
            orphaned,
            "Simulation shut down"
        );
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Internals
    // ═══════════════════════════════════════════════════════════════════════════

    /// Schedule an external command now and process everything now due.
    fn command(&mut self, event: Event) {
        if self.shut_down {
            debug!(event = event.type_name(), "Command after shutdown, ignoring");
            return;
        }
        self.schedule(self.now, event);
        self.run_until(self.now);
    }

    fn schedule(&mut self, time: Duration, event: Event) -> EventKey {
        let key = EventKey::new(time, &event, self.sequence);
        self.sequence += 1;
        self.queue.insert(key, event);
        key
    }

    fn process_action(&mut self, action: Action) {
        match action {
            Action::SetTimer { id, duration } => {
                if let Some(previous) = self.timers.remove(&id) {
                    self.queue.remove(&previous);
                }
                if self.shut_down {
                    return;
                }
                let key = self.schedule(self.now + duration, id.event());
                self.timers.insert(id, key);
                self.stats.timers_set += 1;
                trace!(timer = %id, fires_at = ?key.time, "Timer set");
            }

            Action::CancelTimer { id } => {
                if let Some(key) = self.timers.remove(&id) {
                    self.queue.remove(&key);
                    self.stats.timers_cancelled += 1;
                    trace!(timer = %id, "Timer cancelled");
                }
            }

            Action::Notify(notification) => {
                self.stats.notifications += 1;
                if self.notifications.len() == self.notification_capacity {
                    self.notifications.pop_front();
                    self.stats.notifications_dropped += 1;
                    if self.stats.notifications_dropped == 1 {
                        warn!(
                            capacity = self.notification_capacity,
                            "Notification log full, discarding oldest entries"
                        );
                    }
                }
                self.notifications.push_back((self.now, notification));
            }
        }
    }
}

impl Drop for SimulationRunner {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    fn runner(seed: u64) -> SimulationRunner {
        SimulationRunner::new(DashboardConfig::default(), seed).unwrap()
    }

    #[traced_test]
    #[test]
    fn test_nothing_happens_before_start() {
        let mut runner = runner(1);
        runner.run_until(Duration::from_secs(30));
        assert_eq!(runner.stats().events_processed, 0);
        assert_eq!(runner.view().round.time_remaining, 60);
    }

    #[traced_test]
    #[test]
    fn test_set_timer_replaces_previous() {
        let mut runner = runner(2);
        runner.start();
        let queued = runner.queue.len();

        runner.process_action(Action::SetTimer {
            id: TimerId::RoundTick,
            duration: Duration::from_millis(300),
        });
        assert_eq!(runner.queue.len(), queued);
        assert_eq!(runner.timers[&TimerId::RoundTick].time, Duration::from_millis(300));
    }

    #[traced_test]
    #[test]
    fn test_run_until_advances_clock() {
        let mut runner = runner(3);
        runner.start();
        runner.run_until(Duration::from_millis(2_500));
        assert_eq!(runner.now(), Duration::from_millis(2_500));
        assert_eq!(runner.view().round.time_remaining, 58);
        assert!(runner.is_timer_armed(TimerId::RoundTick));
    }

    #[traced_test]
    #[test]
    fn test_notification_log_is_bounded() {
        let mut runner = runner(4).with_notification_capacity(32);
        runner.start();
        runner.run_until(Duration::from_secs(3_600));

        assert_eq!(runner.notifications().len(), 32);
        let published = runner.stats().notifications;
        assert_eq!(runner.stats().notifications_dropped, published - 32);

        // The newest entries survive
        let last = runner.notifications().back().unwrap().0;
        assert!(last <= Duration::from_secs(3_600));
        assert!(last >= Duration::from_secs(3_500));

        assert_eq!(runner.drain_notifications().len(), 32);
        assert!(runner.notifications().is_empty());
        runner.run_until(Duration::from_secs(3_601));
        assert!(runner.notifications().len() <= 32);
    }
}
