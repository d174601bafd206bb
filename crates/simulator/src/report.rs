//! Run summary.

use crate::SimulatorError;
use hdrhistogram::Histogram;
use serde::Serialize;
use std::time::Duration;
use timeboost_core::Notification;
use timeboost_node::DashboardView;
use timeboost_types::{display, Address, Gwei, RoundId};

/// Outcome of one resolved round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundSummary {
    pub round_id: RoundId,
    pub resolved_at: Duration,
    pub winner: Address,
    pub winning_bid: Gwei,
    /// What the winner pays.
    pub second_price: Gwei,
    pub bid_count: u32,
}

/// Gas usage percentiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GasPercentiles {
    pub p50: u64,
    pub p90: u64,
    pub p99: u64,
    pub max: u64,
    pub mean: f64,
}

/// Summary of a simulation run, built from the notification stream.
#[derive(Debug, Serialize)]
pub struct SimulationReport {
    /// Resolved rounds, oldest first.
    pub rounds: Vec<RoundSummary>,

    /// Transactions observed after start (the seeded history excluded).
    pub transactions: u64,

    /// Express lane transactions observed after start.
    pub express_transactions: u64,

    /// Transactions that raised an error alert.
    pub error_alerts: u64,

    /// Sealed bids placed.
    pub bids: u64,

    /// Pause flag changes.
    pub pause_toggles: u64,

    /// Gas usage of observed transactions.
    pub gas: GasPercentiles,

    /// Dashboard state at the end of the run.
    pub final_view: Option<DashboardView>,

    #[serde(skip)]
    round_duration: u32,

    #[serde(skip)]
    gas_histogram: Histogram<u64>,
}

impl SimulationReport {
    /// Create an empty report for rounds of `round_duration` ticks.
    pub fn new(round_duration: u32) -> Result<Self, SimulatorError> {
        Ok(Self {
            rounds: Vec::new(),
            transactions: 0,
            express_transactions: 0,
            error_alerts: 0,
            bids: 0,
            pause_toggles: 0,
            gas: GasPercentiles::default(),
            final_view: None,
            round_duration,
            gas_histogram: Histogram::new(3)?,
        })
    }

    /// Fold one notification into the report.
    pub fn observe(&mut self, at: Duration, notification: &Notification) {
        match notification {
            Notification::RoundResolved {
                round_id,
                resolution,
                bid_count,
            } => self.rounds.push(RoundSummary {
                round_id: *round_id,
                resolved_at: at,
                winner: resolution.winner,
                winning_bid: resolution.winning_bid,
                second_price: resolution.second_highest_bid,
                bid_count: *bid_count,
            }),
            Notification::BidPlaced(_) => self.bids += 1,
            Notification::TransactionObserved(tx) => {
                self.transactions += 1;
                if tx.timeboost {
                    self.express_transactions += 1;
                }
                self.gas_histogram.saturating_record(tx.gas_used);
            }
            Notification::ErrorAlert(_) => self.error_alerts += 1,
            Notification::PauseChanged { .. } => self.pause_toggles += 1,
            Notification::RoundStarted { .. } | Notification::PhaseChanged { .. } => {}
        }
    }

    /// Record the final state and compute the percentiles.
    pub fn finish(&mut self, view: DashboardView) {
        if !self.gas_histogram.is_empty() {
            self.gas = GasPercentiles {
                p50: self.gas_histogram.value_at_quantile(0.5),
                p90: self.gas_histogram.value_at_quantile(0.9),
                p99: self.gas_histogram.value_at_quantile(0.99),
                max: self.gas_histogram.max(),
                mean: self.gas_histogram.mean(),
            };
        }
        self.final_view = Some(view);
    }

    /// Share of observed transactions that used the express lane, in percent.
    pub fn express_share(&self) -> f64 {
        if self.transactions == 0 {
            0.0
        } else {
            self.express_transactions as f64 * 100.0 / self.transactions as f64
        }
    }

    /// Print a human-readable summary.
    pub fn print(&self) {
        println!("\n=== Timeboost Simulation Report ===");
        if let Some(view) = &self.final_view {
            println!("Simulated time:     {:?}", view.now);
            println!(
                "Current round:      {} ({}, {} left, {:.0}% elapsed)",
                view.round.id,
                view.round.phase,
                display::format_countdown(view.round.time_remaining),
                display::progress_percent(view.round.time_remaining, self.round_duration),
            );
            println!(
                "Express lane:       {}",
                view.round
                    .controller
                    .map_or_else(|| "inactive".to_string(), |c| c.short())
            );
            println!("Paused:             {}", view.paused);
        }

        println!("\nRounds resolved:    {}", self.rounds.len());
        for round in &self.rounds {
            println!(
                "  {:<10} winner {} bid {} pays {} ({} bids)",
                round.round_id,
                round.winner.short(),
                round.winning_bid,
                round.second_price,
                round.bid_count,
            );
        }

        println!("\nBids placed:        {}", self.bids);
        println!("Transactions:       {}", self.transactions);
        println!(
            "Express lane:       {} ({:.1}%)",
            self.express_transactions,
            self.express_share()
        );
        println!("Error alerts:       {}", self.error_alerts);
        println!("Pause toggles:      {}", self.pause_toggles);

        println!("\nGas used:");
        println!("  p50:  {}", self.gas.p50);
        println!("  p90:  {}", self.gas.p90);
        println!("  p99:  {}", self.gas.p99);
        println!("  max:  {}", self.gas.max);
        println!("  mean: {:.0}", self.gas.mean);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timeboost_types::{Resolution, Transaction, TxHash, TxStatus};

    fn tx(gas_used: u64, timeboost: bool) -> Transaction {
        Transaction {
            hash: TxHash::from_bytes(&gas_used.to_le_bytes()),
            sequence_number: gas_used,
            status: TxStatus::Confirmed,
            gas_used,
            timeboost,
            delay: Duration::ZERO,
            from: Address([1; 20]),
            to: Address([2; 20]),
            timestamp: Duration::ZERO,
            error: None,
            round_controller: None,
        }
    }

    #[test]
    fn test_folds_notifications() {
        let mut report = SimulationReport::new(60).unwrap();
        for gas in [21_000, 50_000, 90_000, 120_000] {
            report.observe(
                Duration::ZERO,
                &Notification::TransactionObserved(Box::new(tx(gas, gas > 80_000))),
            );
        }
        report.observe(
            Duration::from_secs(60),
            &Notification::RoundResolved {
                round_id: RoundId(1),
                resolution: Resolution {
                    winner: Address([3; 20]),
                    winning_bid: Gwei::from_milli_eth(40),
                    second_highest_bid: Gwei::from_milli_eth(32),
                },
                bid_count: 9,
            },
        );

        assert_eq!(report.transactions, 4);
        assert_eq!(report.express_share(), 50.0);
        assert_eq!(report.rounds.len(), 1);
        assert_eq!(report.rounds[0].second_price, Gwei::from_milli_eth(32));
        assert!(report.gas_histogram.max() >= 119_000);
    }
}
