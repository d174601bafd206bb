//! Round clock configuration.

use serde::Deserialize;
use std::time::Duration;
use timeboost_types::Gwei;

/// Fixed countdown step; `time_remaining` and `next_round_starts_in` are
/// both whole seconds.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// What happens to an already scheduled round rollover when the clock is
/// paused during the reveal hold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RolloverPolicy {
    /// The rollover fires on schedule even while paused; only ticking stops.
    #[default]
    FireWhilePaused,

    /// The rollover is suspended with the clock and resumes with whatever
    /// hold time was left.
    HoldWhilePaused,
}

impl std::str::FromStr for RolloverPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fire" | "fire-while-paused" => Ok(RolloverPolicy::FireWhilePaused),
            "hold" | "hold-while-paused" => Ok(RolloverPolicy::HoldWhilePaused),
            _ => Err(format!("Unknown rollover policy: {}", s)),
        }
    }
}

/// Configuration for round progression.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    /// Countdown length of a round, in ticks.
    pub duration: u32,

    /// Countdown value at or below which a round is closing.
    pub closing_threshold: u32,

    /// Time spent revealing before the next round starts, in seconds.
    pub reveal_hold_secs: u64,

    /// Minimum acceptable bid, in gwei.
    pub reserve_price: Gwei,

    /// Probability per bidding tick that a sealed bid arrives.
    pub bid_probability: f64,

    /// Pause behaviour of a scheduled rollover.
    pub rollover_policy: RolloverPolicy,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            duration: 60,
            closing_threshold: 15,
            reveal_hold_secs: 5,
            reserve_price: Gwei::from_milli_eth(1),
            bid_probability: 0.2,
            rollover_policy: RolloverPolicy::default(),
        }
    }
}

impl RoundConfig {
    /// Time spent revealing before rollover.
    pub fn reveal_hold(&self) -> Duration {
        Duration::from_secs(self.reveal_hold_secs)
    }

    /// Set the rollover pause policy.
    pub fn with_rollover_policy(mut self, policy: RolloverPolicy) -> Self {
        self.rollover_policy = policy;
        self
    }

    /// Set the per-tick bid probability, clamped to `[0, 1]`.
    pub fn with_bid_probability(mut self, probability: f64) -> Self {
        self.bid_probability = probability.clamp(0.0, 1.0);
        self
    }

    /// Set the reserve price.
    pub fn with_reserve_price(mut self, reserve_price: Gwei) -> Self {
        self.reserve_price = reserve_price;
        self
    }
}
