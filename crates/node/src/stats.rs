//! Cosmetic real-time statistics.
//!
//! These numbers only make the dashboard look alive. They random-walk on
//! their own timer, driven by the cosmetic RNG, and feed nothing back into
//! round, auction or transaction state.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the statistics refresh.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Time between refreshes, in milliseconds.
    pub jitter_interval_ms: u64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            jitter_interval_ms: 2_000,
        }
    }
}

impl StatsConfig {
    /// Time between refreshes.
    pub fn jitter_interval(&self) -> Duration {
        Duration::from_millis(self.jitter_interval_ms)
    }
}

/// Headline numbers shown above the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RealTimeStats {
    pub active_auctions: u32,
    pub total_bids: u64,
    /// ETH.
    pub avg_bid_amount: f64,
    /// Transactions per second.
    pub transaction_rate: f64,
    /// Percent.
    pub error_rate: f64,
    /// Percent.
    pub express_lane_usage: f64,
}

impl Default for RealTimeStats {
    fn default() -> Self {
        Self {
            active_auctions: 3,
            total_bids: 1_247,
            avg_bid_amount: 0.045,
            transaction_rate: 45.0,
            error_rate: 2.1,
            express_lane_usage: 78.0,
        }
    }
}

impl RealTimeStats {
    /// Random-walk every figure one step, keeping each within its bounds.
    pub fn jitter(&mut self, rng: &mut impl Rng) {
        if rng.gen_bool(0.3) {
            self.active_auctions = if rng.gen_bool(0.5) {
                self.active_auctions + 1
            } else {
                self.active_auctions.saturating_sub(1).max(1)
            };
        }
        self.total_bids += rng.gen_range(0..=2);
        self.avg_bid_amount = (self.avg_bid_amount + centered(rng) * 0.01).max(0.01);
        self.transaction_rate = (self.transaction_rate + centered(rng) * 10.0).max(10.0);
        self.error_rate = (self.error_rate + centered(rng) * 0.5).clamp(0.0, 10.0);
        self.express_lane_usage = (self.express_lane_usage + centered(rng) * 5.0).clamp(0.0, 100.0);
    }
}

/// Uniform draw in `[-0.5, 0.5)`.
fn centered(rng: &mut impl Rng) -> f64 {
    rng.gen::<f64>() - 0.5
}
