//! Outbound actions requested by state machines.

use crate::{Event, Notification};
use std::fmt;
use std::time::Duration;
use timeboost_types::RoundId;

/// Identifies a timer owned by the runner.
///
/// At most one timer per id is live: setting a timer replaces any pending
/// timer with the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerId {
    /// Round countdown tick.
    RoundTick,
    /// Deferred replacement of a resolved round.
    RoundRollover(RoundId),
    /// Next simulated transaction arrival.
    TransactionArrival,
    /// Cosmetic statistics refresh.
    StatsJitter,
    /// Transaction volume bucket rotation.
    VolumeSample,
}

impl TimerId {
    /// The event delivered when this timer fires.
    pub fn event(&self) -> Event {
        match *self {
            TimerId::RoundTick => Event::RoundTick,
            TimerId::RoundRollover(round_id) => Event::RoundRollover { round_id },
            TimerId::TransactionArrival => Event::TransactionArrival,
            TimerId::StatsJitter => Event::StatsJitter,
            TimerId::VolumeSample => Event::VolumeSample,
        }
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerId::RoundTick => write!(f, "RoundTick"),
            TimerId::RoundRollover(id) => write!(f, "RoundRollover({})", id),
            TimerId::TransactionArrival => write!(f, "TransactionArrival"),
            TimerId::StatsJitter => write!(f, "StatsJitter"),
            TimerId::VolumeSample => write!(f, "VolumeSample"),
        }
    }
}

/// Actions for the runner to perform.
///
/// State machines never touch timers or observers directly; they describe
/// what should happen and the runner does it.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Schedule `id` to fire after `duration`, replacing any pending timer
    /// with the same id.
    SetTimer {
        /// Timer to arm.
        id: TimerId,
        /// Delay from now.
        duration: Duration,
    },

    /// Cancel a pending timer. No-op if it is not armed.
    CancelTimer {
        /// Timer to cancel.
        id: TimerId,
    },

    /// Publish a notification to observers.
    Notify(Notification),
}
