//! Read accessor for the presentation layer.

use crate::RealTimeStats;
use serde::Serialize;
use std::time::Duration;
use timeboost_feed::VolumeBucket;
use timeboost_types::{Bid, Round, Transaction};

/// Everything a dashboard view renders, captured at one instant.
///
/// Owned copies: holding a view never blocks or observes later updates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    /// Simulation time the view was taken at.
    pub now: Duration,

    /// Current round.
    pub round: Round,

    /// Whether progression is paused.
    pub paused: bool,

    /// Recent transactions, newest first.
    pub transactions: Vec<Transaction>,

    /// Recent bids across rounds, newest first.
    pub bids: Vec<Bid>,

    /// Recent error alerts, newest first.
    pub alerts: Vec<Transaction>,

    /// Transactions produced since start.
    pub transaction_count: u64,

    /// Express transactions produced since start.
    pub express_transaction_count: u64,

    /// Rounds resolved since start.
    pub rounds_resolved: u64,

    /// Closed volume buckets, newest first.
    pub volume: Vec<VolumeBucket>,

    /// Cosmetic headline numbers.
    pub stats: RealTimeStats,
}

impl DashboardView {
    /// Share of transactions that used the express lane, in percent.
    pub fn express_share(&self) -> f64 {
        if self.transaction_count == 0 {
            0.0
        } else {
            self.express_transaction_count as f64 * 100.0 / self.transaction_count as f64
        }
    }
}
