//! Sealed bid records.

use crate::{Address, BidId, Gwei, RoundId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A simulated sealed bid.
///
/// Bids are only created while their round is bidding. `revealed` flips to
/// `true` once, when the round enters the revealing phase, and nothing else
/// about a bid ever changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    /// Unique bid identifier.
    pub id: BidId,
    /// Round the bid was placed in.
    pub round_id: RoundId,
    /// Bidding address.
    pub bidder: Address,
    /// Bid amount.
    pub amount: Gwei,
    /// Simulation time the bid was placed at.
    pub timestamp: Duration,
    /// Whether the bid amount has been revealed.
    pub revealed: bool,
}

impl Bid {
    /// Create a new, still sealed bid.
    pub fn sealed(
        id: BidId,
        round_id: RoundId,
        bidder: Address,
        amount: Gwei,
        timestamp: Duration,
    ) -> Self {
        Self {
            id,
            round_id,
            bidder,
            amount,
            timestamp,
            revealed: false,
        }
    }
}
