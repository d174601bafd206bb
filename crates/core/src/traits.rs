//! Core traits for state machines.

use crate::{Action, Event};
use std::time::Duration;

/// A state machine that processes events.
///
/// This is the core abstraction for the dashboard simulation. All round,
/// auction and feed logic is implemented as state machines that are:
///
/// - **Synchronous**: No async, no `.await`
/// - **Deterministic**: Same state + event + seed = same actions
/// - **Pure-ish**: Mutates self, but performs no I/O and never reads the wall clock
///
/// # Example
///
/// ```ignore
/// impl StateMachine for DashboardStateMachine {
///     fn handle(&mut self, event: Event) -> Vec<Action> {
///         match event {
///             Event::RoundTick => self.clock.on_tick(&mut self.auction, &mut self.rng),
///             Event::TransactionArrival => self.on_transaction_arrival(),
///             // ... etc
///         }
///     }
///
///     fn set_time(&mut self, now: Duration) {
///         self.now = now;
///     }
/// }
/// ```
pub trait StateMachine {
    /// Process an event, returning actions to perform.
    ///
    /// # Guarantees
    ///
    /// - **Synchronous**: This method never blocks or awaits
    /// - **Atomic**: Observers never see state from the middle of a `handle` call
    /// - **No I/O**: Timers and notifications are performed by the runner via the returned actions
    ///
    /// # Returns
    ///
    /// A list of actions for the runner to execute. Actions may include:
    /// - Setting or cancelling timers
    /// - Enqueueing internal events
    /// - Publishing notifications to observers
    fn handle(&mut self, event: Event) -> Vec<Action>;

    /// Set the current time.
    ///
    /// Called by the runner before each `handle()` call to provide the
    /// current simulation or wall-clock time.
    fn set_time(&mut self, now: Duration);

    /// Get the current time.
    ///
    /// Returns the time that was last set via `set_time()`.
    fn now(&self) -> Duration;
}
