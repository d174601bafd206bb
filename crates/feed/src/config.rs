//! Transaction feed configuration.

use serde::Deserialize;
use std::ops::Range;
use std::time::Duration;

/// Configuration for the simulated transaction stream.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Shortest time between arrivals, in milliseconds.
    pub arrival_min_ms: u64,

    /// Longest time between arrivals, in milliseconds.
    pub arrival_max_ms: u64,

    /// Probability a transaction is confirmed.
    pub confirmed_probability: f64,

    /// Share of non-confirmed transactions that are pending (rest fail).
    pub pending_share: f64,

    /// Smallest fabricated gas usage.
    pub gas_min: u64,

    /// Largest fabricated gas usage (exclusive).
    pub gas_max: u64,

    /// Probability a transaction that did not fail still carries an error.
    pub spurious_error_probability: f64,

    /// Probability a transaction is controller-initiated while the express
    /// lane has a controller.
    pub express_probability: f64,

    /// Ordering delay for non-express transactions, in milliseconds.
    pub standard_delay_ms: u64,

    /// Number of most recent transactions retained.
    pub transaction_window: usize,

    /// Number of most recent error alerts retained.
    pub alert_window: usize,

    /// Transactions fabricated at start so the window is not empty.
    pub initial_transactions: usize,

    /// Number of closed one-interval volume buckets retained.
    pub volume_buckets: usize,

    /// Length of a volume bucket, in seconds.
    pub volume_interval_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            arrival_min_ms: 1_000,
            arrival_max_ms: 4_000,
            confirmed_probability: 0.9,
            pending_share: 0.5,
            gas_min: 21_000,
            gas_max: 121_000,
            spurious_error_probability: 0.05,
            express_probability: 0.1,
            standard_delay_ms: 200,
            transaction_window: 50,
            alert_window: 5,
            initial_transactions: 20,
            volume_buckets: 24,
            volume_interval_secs: 60,
        }
    }
}

impl FeedConfig {
    /// Inter-arrival time range in milliseconds (inclusive of both ends).
    pub fn arrival_range_ms(&self) -> (u64, u64) {
        (self.arrival_min_ms, self.arrival_max_ms)
    }

    /// Gas usage range.
    pub fn gas_range(&self) -> Range<u64> {
        self.gas_min..self.gas_max
    }

    /// Ordering delay for non-express transactions.
    pub fn standard_delay(&self) -> Duration {
        Duration::from_millis(self.standard_delay_ms)
    }

    /// Length of a volume bucket.
    pub fn volume_interval(&self) -> Duration {
        Duration::from_secs(self.volume_interval_secs)
    }

    /// Set the inter-arrival range in milliseconds.
    pub fn with_arrival_range_ms(mut self, min: u64, max: u64) -> Self {
        self.arrival_min_ms = min;
        self.arrival_max_ms = max;
        self
    }

    /// Set the controller-initiated probability, clamped to `[0, 1]`.
    pub fn with_express_probability(mut self, probability: f64) -> Self {
        self.express_probability = probability.clamp(0.0, 1.0);
        self
    }

    /// Set the number of transactions fabricated at start.
    pub fn with_initial_transactions(mut self, count: usize) -> Self {
        self.initial_transactions = count;
        self
    }

    /// Set the confirmed probability, clamped to `[0, 1]`.
    pub fn with_confirmed_probability(mut self, probability: f64) -> Self {
        self.confirmed_probability = probability.clamp(0.0, 1.0);
        self
    }
}
