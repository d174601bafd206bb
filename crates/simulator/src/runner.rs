//! Drives a dashboard run in virtual or wall-clock time.

use crate::{SimulationReport, SimulatorConfig, SimulatorError};
use std::time::Duration;
use timeboost_core::Notification;
use timeboost_simulation::SimulationRunner;
use tracing::{debug, info};

/// Virtual time between folds of the runner's notification log into the
/// report.
const COLLECT_INTERVAL: Duration = Duration::from_secs(60);

/// A configured run: the dashboard, its scheduled pause toggles, and the
/// report being built.
pub struct Simulator {
    runner: SimulationRunner,
    report: SimulationReport,
    duration: Duration,

    /// Pending pause toggles, soonest first.
    toggles: Vec<Duration>,
}

impl Simulator {
    /// Validate `config` and set up a run.
    pub fn new(config: SimulatorConfig) -> Result<Self, SimulatorError> {
        config.validate()?;
        let mut toggles = config.pause_toggles()?;
        toggles.reverse();
        let duration = config.duration();

        let report = SimulationReport::new(config.dashboard.round.duration)?;
        let runner = SimulationRunner::new(config.dashboard, config.seed)?;
        Ok(Self {
            runner,
            report,
            duration,
            toggles,
        })
    }

    /// The underlying runner.
    pub fn runner(&self) -> &SimulationRunner {
        &self.runner
    }

    /// Run to completion in virtual time.
    pub fn run(mut self) -> SimulationReport {
        info!(duration = ?self.duration, "Starting simulation");
        self.runner.start();

        while let Some(at) = self.next_toggle() {
            self.advance_to(at);
            self.runner.toggle_pause();
        }
        self.advance_to(self.duration);
        self.finish()
    }

    /// Run against the wall clock, logging notifications as they happen.
    ///
    /// Stops at the configured duration or on Ctrl-C.
    pub async fn run_realtime(mut self) -> SimulationReport {
        info!(duration = ?self.duration, "Starting real-time simulation");
        let origin = tokio::time::Instant::now();
        self.runner.start();
        self.log_and_collect();

        loop {
            let next_event = self.runner.next_event_time().unwrap_or(self.duration);
            let next_toggle = self.toggles.last().copied().unwrap_or(self.duration);
            let target = next_event.min(next_toggle).min(self.duration);

            tokio::select! {
                _ = tokio::time::sleep_until(origin + target) => {}
                _ = tokio::signal::ctrl_c() => {
                    info!(at = ?self.runner.now(), "Interrupted");
                    break;
                }
            }

            self.runner.run_until(target);
            if self.toggles.last() == Some(&target) {
                self.toggles.pop();
                self.runner.toggle_pause();
            }
            self.log_and_collect();

            if target >= self.duration {
                break;
            }
        }

        self.finish()
    }

    /// Pop the next toggle if it falls within the run.
    fn next_toggle(&mut self) -> Option<Duration> {
        let at = *self.toggles.last()?;
        if at <= self.duration {
            self.toggles.pop()
        } else {
            None
        }
    }

    /// Run to `end`, folding notifications into the report as it goes so
    /// the runner's log stays small.
    fn advance_to(&mut self, end: Duration) {
        loop {
            let next = (self.runner.now() + COLLECT_INTERVAL).min(end);
            self.runner.run_until(next);
            self.collect();
            if next >= end {
                break;
            }
        }
    }

    fn collect(&mut self) {
        for (at, notification) in self.runner.drain_notifications() {
            self.report.observe(at, &notification);
        }
    }

    fn log_and_collect(&mut self) {
        for (at, notification) in self.runner.drain_notifications() {
            log_notification(at, &notification);
            self.report.observe(at, &notification);
        }
    }

    fn finish(mut self) -> SimulationReport {
        let view = self.runner.view();
        self.runner.shutdown();
        self.collect();
        self.report.finish(view);
        self.report
    }
}

fn log_notification(at: Duration, notification: &Notification) {
    match notification {
        Notification::RoundStarted {
            round_id,
            controller,
        } => info!(
            ?at,
            round = %round_id,
            controller = %controller.map_or_else(|| "none".to_string(), |c| c.short()),
            "Round started"
        ),
        Notification::PhaseChanged { round_id, phase } => {
            info!(?at, round = %round_id, %phase, "Phase changed")
        }
        Notification::RoundResolved {
            round_id,
            resolution,
            bid_count,
        } => info!(
            ?at,
            round = %round_id,
            winner = %resolution.winner.short(),
            pays = %resolution.second_highest_bid,
            bids = bid_count,
            "Round resolved"
        ),
        Notification::BidPlaced(bid) => {
            debug!(?at, bid = %bid.id, amount = %bid.amount, "Bid placed")
        }
        Notification::TransactionObserved(tx) => debug!(
            ?at,
            seq = tx.sequence_number,
            status = %tx.status,
            express = tx.timeboost,
            "Transaction"
        ),
        Notification::ErrorAlert(tx) => info!(
            ?at,
            hash = %tx.hash,
            error = ?tx.error,
            "Transaction error"
        ),
        Notification::PauseChanged { paused } => info!(?at, paused, "Pause toggled"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[traced_test]
    #[test]
    fn test_virtual_run_report() {
        let config = SimulatorConfig::default()
            .with_seed(3)
            .with_duration(Duration::from_secs(65 * 3));
        let report = Simulator::new(config).unwrap().run();

        assert_eq!(report.rounds.len(), 3);
        for round in &report.rounds {
            assert!(round.second_price <= round.winning_bid);
        }
        assert!(report.transactions > 0);
        assert!(report.gas.p50 >= 21_000);
        assert!(report.gas.max < 122_000);
        let view = report.final_view.as_ref().unwrap();
        assert_eq!(view.now, Duration::from_secs(195));
    }

    #[traced_test]
    #[test]
    fn test_pause_window_applied() {
        let config = SimulatorConfig::default()
            .with_duration(Duration::from_secs(120))
            .with_pause_window(Some(Duration::from_secs(30)), Some(Duration::from_secs(90)));
        let report = Simulator::new(config).unwrap().run();

        assert_eq!(report.pause_toggles, 2);
        // 30 ticks before the pause and 30 after
        let view = report.final_view.unwrap();
        assert_eq!(view.round.time_remaining, 0);
        assert_eq!(report.rounds.len(), 1);
    }

    #[traced_test]
    #[test]
    fn test_long_run_keeps_runner_log_drained() {
        let config = SimulatorConfig::default()
            .with_seed(5)
            .with_duration(Duration::from_secs(4 * 3_600));
        let mut simulator = Simulator::new(config).unwrap();
        simulator.runner.start();
        simulator.advance_to(simulator.duration);

        // At most one collection interval of notifications is ever pending
        assert!(simulator.runner.notifications().is_empty());
        assert_eq!(simulator.runner.stats().notifications_dropped, 0);
        let published = simulator.runner.stats().notifications;
        let report = simulator.finish();
        assert_eq!(report.rounds.len() as u64, 4 * 3_600 / 65);
        assert!(report.transactions + report.bids + report.rounds.len() as u64 <= published);
    }

    #[tokio::test(start_paused = true)]
    #[traced_test]
    async fn test_realtime_run_matches_virtual() {
        let config = SimulatorConfig::default()
            .with_seed(9)
            .with_duration(Duration::from_secs(70));
        let realtime = Simulator::new(config.clone()).unwrap().run_realtime().await;
        let simulated = Simulator::new(config).unwrap().run();

        assert_eq!(realtime.rounds, simulated.rounds);
        assert_eq!(realtime.transactions, simulated.transactions);
        assert_eq!(realtime.final_view, simulated.final_view);
    }
}
