//! Auction round snapshot types.

use crate::{Address, Gwei, RoundId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of an auction round.
///
/// The phase is never stored independently of the countdown: it is always
/// recomputed from `time_remaining` with [`Phase::classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Sealed bids are being accepted.
    Bidding,
    /// Final seconds before the round closes.
    Closing,
    /// Countdown reached zero; bids are revealed and the winner is known.
    Revealing,
}

impl Phase {
    /// Classify a countdown value.
    ///
    /// `0` is `Revealing`, `1..=closing_threshold` is `Closing`, anything
    /// above is `Bidding`.
    pub fn classify(time_remaining: u32, closing_threshold: u32) -> Self {
        if time_remaining == 0 {
            Phase::Revealing
        } else if time_remaining <= closing_threshold {
            Phase::Closing
        } else {
            Phase::Bidding
        }
    }

    /// Get a human-readable name for this phase.
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Bidding => "bidding",
            Phase::Closing => "closing",
            Phase::Revealing => "revealing",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of a second-price auction.
///
/// The winner pays `second_highest_bid`, not `winning_bid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Address granted express lane control for the next round.
    pub winner: Address,
    /// Highest sealed bid.
    pub winning_bid: Gwei,
    /// Price actually charged to the winner.
    pub second_highest_bid: Gwei,
}

/// Snapshot of the current auction round.
///
/// Snapshots are immutable once published; the round clock publishes a new
/// one on every tick and a brand-new round on rollover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    /// Unique round identifier.
    pub id: RoundId,
    /// Current phase, derived from `time_remaining`.
    pub phase: Phase,
    /// Seconds left on the countdown.
    pub time_remaining: u32,
    /// Seconds until the next round starts.
    pub next_round_starts_in: u32,
    /// Minimum acceptable bid.
    pub reserve_price: Gwei,
    /// Number of sealed bids accepted this round.
    pub bid_count: u32,
    /// Previous round's winner, holder of the express lane this round.
    pub controller: Option<Address>,
    /// Auction outcome. Present only once the countdown reached zero.
    pub resolution: Option<Resolution>,
}

impl Round {
    /// Create a freshly opened round in the bidding phase.
    pub fn open(
        id: RoundId,
        duration: u32,
        closing_threshold: u32,
        reserve_price: Gwei,
        controller: Option<Address>,
    ) -> Self {
        Self {
            id,
            phase: Phase::classify(duration, closing_threshold),
            time_remaining: duration,
            next_round_starts_in: duration,
            reserve_price,
            bid_count: 0,
            controller,
            resolution: None,
        }
    }

    /// Whether a controller currently holds express lane rights.
    pub fn express_lane_active(&self) -> bool {
        self.controller.is_some()
    }

    /// Whether the auction for this round has been decided.
    pub fn is_resolved(&self) -> bool {
        self.resolution.is_some()
    }

    /// Winner of this round's auction.
    pub fn winner(&self) -> Option<Address> {
        self.resolution.map(|r| r.winner)
    }

    /// Highest sealed bid of this round's auction.
    pub fn winning_bid(&self) -> Option<Gwei> {
        self.resolution.map(|r| r.winning_bid)
    }

    /// Price charged to this round's winner.
    pub fn second_highest_bid(&self) -> Option<Gwei> {
        self.resolution.map(|r| r.second_highest_bid)
    }
}
