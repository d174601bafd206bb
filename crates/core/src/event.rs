//! Inbound events processed by the dashboard state machines.

use timeboost_types::RoundId;

/// Events delivered to a [`StateMachine`](crate::StateMachine).
///
/// Timer events are produced by the runner when a timer set via
/// [`Action::SetTimer`](crate::Action::SetTimer) fires. Command events come
/// from the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // ═══════════════════════════════════════════════════════════════════════
    // Lifecycle
    // ═══════════════════════════════════════════════════════════════════════
    /// The owning scope came up; arm the initial timers.
    Start,

    /// The owning scope is going away; cancel every timer.
    Shutdown,

    // ═══════════════════════════════════════════════════════════════════════
    // Timers
    // ═══════════════════════════════════════════════════════════════════════
    /// One-second round countdown tick.
    RoundTick,

    /// Reveal hold elapsed for `round_id`; replace it with a fresh round.
    RoundRollover {
        /// Round that was resolved when the rollover was scheduled.
        round_id: RoundId,
    },

    /// A simulated transaction arrives.
    TransactionArrival,

    /// Refresh the cosmetic statistics.
    StatsJitter,

    /// Close the current transaction volume bucket.
    VolumeSample,

    // ═══════════════════════════════════════════════════════════════════════
    // Commands
    // ═══════════════════════════════════════════════════════════════════════
    /// Flip the pause flag.
    TogglePause,
}

impl Event {
    /// Get a human-readable name for this event type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Event::Start => "Start",
            Event::Shutdown => "Shutdown",
            Event::RoundTick => "RoundTick",
            Event::RoundRollover { .. } => "RoundRollover",
            Event::TransactionArrival => "TransactionArrival",
            Event::StatsJitter => "StatsJitter",
            Event::VolumeSample => "VolumeSample",
            Event::TogglePause => "TogglePause",
        }
    }

    /// Check if this event is delivered by a timer.
    pub fn is_timer(&self) -> bool {
        matches!(
            self,
            Event::RoundTick
                | Event::RoundRollover { .. }
                | Event::TransactionArrival
                | Event::StatsJitter
                | Event::VolumeSample
        )
    }

    /// Processing priority when several events are due at the same instant.
    ///
    /// Lower runs first: lifecycle and commands before timers, and the round
    /// clock before the transaction feed so transactions see the round state
    /// of the current tick.
    pub fn priority(&self) -> u8 {
        match self {
            Event::Start | Event::Shutdown => 0,
            Event::TogglePause => 1,
            Event::RoundTick => 2,
            Event::RoundRollover { .. } => 3,
            Event::TransactionArrival => 4,
            Event::VolumeSample => 5,
            Event::StatsJitter => 6,
        }
    }
}
