//! Configuration for the auction simulator.

use serde::Deserialize;
use timeboost_types::Gwei;

/// Configuration for simulated bidding and winner determination.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AuctionConfig {
    /// Lowest possible winning bid. The effective floor is never below the
    /// round's reserve price.
    pub min_winning_bid: Gwei,

    /// Lower end of the fabricated winning bid range.
    pub winning_bid_base: Gwei,

    /// Width of the fabricated winning bid range above `winning_bid_base`.
    pub winning_bid_spread: Gwei,

    /// Second price as a percentage of the winning bid, before the reserve
    /// floor is applied.
    pub second_price_percent: u64,

    /// Largest amount a new bid raises over the current top bid.
    pub max_bid_increment: Gwei,

    /// Number of most recent bids retained.
    pub bid_window: usize,
}

impl Default for AuctionConfig {
    fn default() -> Self {
        Self {
            min_winning_bid: Gwei::from_milli_eth(1),
            winning_bid_base: Gwei::from_milli_eth(20),
            winning_bid_spread: Gwei::from_milli_eth(50),
            second_price_percent: 80,
            max_bid_increment: Gwei::from_milli_eth(10),
            bid_window: 10,
        }
    }
}

impl AuctionConfig {
    /// Set the number of retained bids.
    pub fn with_bid_window(mut self, bid_window: usize) -> Self {
        self.bid_window = bid_window;
        self
    }

    /// Set the fabricated winning bid range.
    pub fn with_winning_bid_range(mut self, base: Gwei, spread: Gwei) -> Self {
        self.winning_bid_base = base;
        self.winning_bid_spread = spread;
        self
    }

    /// Set the second price ratio, clamped to at most 100%.
    pub fn with_second_price_percent(mut self, percent: u64) -> Self {
        self.second_price_percent = percent.min(100);
        self
    }
}
