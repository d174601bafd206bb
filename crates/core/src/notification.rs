//! Notifications published to dashboard observers.

use timeboost_types::{Address, Bid, Phase, Resolution, RoundId, Transaction};

/// Observable state changes.
///
/// These are what a presentation layer or the simulator report subscribes
/// to. The runner delivers them in the order they were produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    // ═══════════════════════════════════════════════════════════════════════
    // Round lifecycle
    // ═══════════════════════════════════════════════════════════════════════
    /// A new round opened.
    RoundStarted {
        /// The new round.
        round_id: RoundId,
        /// Express lane holder for the round.
        controller: Option<Address>,
    },

    /// The round moved to a different phase.
    PhaseChanged {
        /// Round whose phase changed.
        round_id: RoundId,
        /// New phase.
        phase: Phase,
    },

    /// The auction for a round was decided.
    RoundResolved {
        /// Resolved round.
        round_id: RoundId,
        /// Outcome.
        resolution: Resolution,
        /// Sealed bids accepted during the round.
        bid_count: u32,
    },

    // ═══════════════════════════════════════════════════════════════════════
    // Auction activity
    // ═══════════════════════════════════════════════════════════════════════
    /// A sealed bid was placed.
    BidPlaced(Bid),

    // ═══════════════════════════════════════════════════════════════════════
    // Transaction feed
    // ═══════════════════════════════════════════════════════════════════════
    /// A transaction entered the feed window.
    TransactionObserved(Box<Transaction>),

    /// A transaction carried an error and was added to the alert list.
    ErrorAlert(Box<Transaction>),

    // ═══════════════════════════════════════════════════════════════════════
    // Control
    // ═══════════════════════════════════════════════════════════════════════
    /// The pause flag changed.
    PauseChanged {
        /// New value of the flag.
        paused: bool,
    },
}

impl Notification {
    /// Get a human-readable name for this notification type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Notification::RoundStarted { .. } => "RoundStarted",
            Notification::PhaseChanged { .. } => "PhaseChanged",
            Notification::RoundResolved { .. } => "RoundResolved",
            Notification::BidPlaced(_) => "BidPlaced",
            Notification::TransactionObserved(_) => "TransactionObserved",
            Notification::ErrorAlert(_) => "ErrorAlert",
            Notification::PauseChanged { .. } => "PauseChanged",
        }
    }

    /// Check if this is a round lifecycle notification.
    pub fn is_round(&self) -> bool {
        matches!(
            self,
            Notification::RoundStarted { .. }
                | Notification::PhaseChanged { .. }
                | Notification::RoundResolved { .. }
        )
    }

    /// Check if this is a transaction feed notification.
    pub fn is_feed(&self) -> bool {
        matches!(
            self,
            Notification::TransactionObserved(_) | Notification::ErrorAlert(_)
        )
    }
}
