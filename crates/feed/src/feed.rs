//! Simulated transaction stream.

use crate::{ExpressLaneTagger, FeedConfig, VolumeTracker};
use rand::Rng;
use std::time::Duration;
use timeboost_core::{Action, Notification, TimerId};
use timeboost_types::{Address, BoundedWindow, Transaction, TxError, TxHash, TxStatus};
use tracing::{debug, trace};

/// Fabricates transactions and keeps the recent history.
///
/// Every transaction lands in the most-recent window; one that carries an
/// error is also pushed onto the alert list. Both are newest first and
/// evict their oldest entry past the cap in the same call that inserts.
pub struct TransactionFeed {
    config: FeedConfig,
    tagger: ExpressLaneTagger,

    /// Most recent transactions, newest first.
    transactions: BoundedWindow<Transaction>,

    /// Most recent errored transactions, newest first.
    alerts: BoundedWindow<Transaction>,

    /// Per-interval volume.
    volume: VolumeTracker,

    /// Sequence number assigned to the next transaction.
    next_sequence: u64,

    /// Transactions produced since start.
    transaction_count: u64,

    /// Express transactions produced since start.
    express_count: u64,

    /// Whether arrivals are suspended.
    suspended: bool,

    /// Current simulation time.
    now: Duration,
}

impl TransactionFeed {
    /// Create an empty feed.
    pub fn new(config: FeedConfig) -> Self {
        Self {
            tagger: ExpressLaneTagger::new(config.express_probability, config.standard_delay()),
            transactions: BoundedWindow::new(config.transaction_window),
            alerts: BoundedWindow::new(config.alert_window),
            volume: VolumeTracker::new(config.volume_buckets),
            config,
            next_sequence: 1,
            transaction_count: 0,
            express_count: 0,
            suspended: false,
            now: Duration::ZERO,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Accessors
    // ═══════════════════════════════════════════════════════════════════════════

    /// Set the current time.
    pub fn set_time(&mut self, now: Duration) {
        self.now = now;
    }

    /// Get the configuration.
    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Recent transactions, newest first.
    pub fn transactions(&self) -> &BoundedWindow<Transaction> {
        &self.transactions
    }

    /// Recent error alerts, newest first.
    pub fn alerts(&self) -> &BoundedWindow<Transaction> {
        &self.alerts
    }

    /// Per-interval volume.
    pub fn volume(&self) -> &VolumeTracker {
        &self.volume
    }

    /// Transactions produced since start.
    pub fn transaction_count(&self) -> u64 {
        self.transaction_count
    }

    /// Express transactions produced since start.
    pub fn express_transaction_count(&self) -> u64 {
        self.express_count
    }

    /// Whether arrivals are suspended.
    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Production
    // ═══════════════════════════════════════════════════════════════════════════

    /// Draw the time until the next arrival.
    pub fn next_arrival_delay(&self, rng: &mut impl Rng) -> Duration {
        let (min, max) = self.config.arrival_range_ms();
        Duration::from_millis(rng.gen_range(min..=max.max(min)))
    }

    /// Fabricate one transaction without recording it.
    ///
    /// `controller` is the current round's controller, copied onto the
    /// transaction as it was at creation time.
    pub fn fabricate(&mut self, controller: Option<Address>, rng: &mut impl Rng) -> Transaction {
        let status = if rng.gen_bool(self.config.confirmed_probability) {
            TxStatus::Confirmed
        } else if rng.gen_bool(self.config.pending_share) {
            TxStatus::Pending
        } else {
            TxStatus::Failed
        };

        let gas_range = self.config.gas_range();
        let gas_used = if gas_range.is_empty() {
            self.config.gas_min
        } else {
            rng.gen_range(gas_range)
        };

        let to = Address::random(rng);
        let sender = Address::random(rng);
        let tagging = self.tagger.tag(controller, sender, rng);

        let error = if status == TxStatus::Failed
            || rng.gen_bool(self.config.spurious_error_probability)
        {
            Some(TxError::ALL[rng.gen_range(0..TxError::ALL.len())])
        } else {
            None
        };

        let sequence_number = self.next_sequence;
        self.next_sequence += 1;

        Transaction {
            hash: TxHash::fabricate(sequence_number, rng),
            sequence_number,
            status,
            gas_used,
            timeboost: tagging.timeboost,
            delay: tagging.delay,
            from: tagging.from,
            to,
            timestamp: self.now,
            error,
            round_controller: controller,
        }
    }

    /// Record a transaction in the windows and counters.
    ///
    /// Returns `true` if it was also added to the alert list.
    pub fn record(&mut self, tx: Transaction) -> bool {
        self.transaction_count += 1;
        if tx.timeboost {
            self.express_count += 1;
        }
        self.volume.observe(&tx);

        let alerted = tx.has_error();
        if alerted {
            self.alerts.push(tx.clone());
        }
        self.transactions.push(tx);
        alerted
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Event Handlers
    // ═══════════════════════════════════════════════════════════════════════════

    /// Seed the initial history and arm the arrival and volume timers.
    ///
    /// The initial transactions are recorded silently: they fill the
    /// windows but produce no notifications.
    pub fn on_start(&mut self, controller: Option<Address>, rng: &mut impl Rng) -> Vec<Action> {
        for _ in 0..self.config.initial_transactions {
            let tx = self.fabricate(controller, rng);
            self.record(tx);
        }
        debug!(
            seeded = self.config.initial_transactions,
            alerts = self.alerts.len(),
            "Transaction feed started"
        );

        let mut actions = vec![Action::SetTimer {
            id: TimerId::VolumeSample,
            duration: self.config.volume_interval(),
        }];
        if !self.suspended {
            actions.push(self.arrival_timer(rng));
        }
        actions
    }

    /// Produce the next transaction and schedule the one after it.
    pub fn on_arrival(&mut self, controller: Option<Address>, rng: &mut impl Rng) -> Vec<Action> {
        if self.suspended {
            return vec![];
        }

        let tx = self.fabricate(controller, rng);
        trace!(
            seq = tx.sequence_number,
            hash = %tx.hash,
            status = %tx.status,
            express = tx.timeboost,
            "Transaction observed"
        );

        let mut actions = vec![Action::Notify(Notification::TransactionObserved(
            Box::new(tx.clone()),
        ))];
        if tx.has_error() {
            debug!(
                seq = tx.sequence_number,
                error = ?tx.error,
                "Transaction error alert"
            );
            actions.push(Action::Notify(Notification::ErrorAlert(Box::new(tx.clone()))));
        }
        self.record(tx);

        actions.push(self.arrival_timer(rng));
        actions
    }

    /// Close the current volume bucket and re-arm the sampler.
    pub fn on_volume_sample(&mut self) -> Vec<Action> {
        let closed = self.volume.rotate(self.now);
        debug!(
            total = closed.total,
            express = closed.express,
            errors = closed.errors,
            "Volume bucket closed"
        );
        vec![Action::SetTimer {
            id: TimerId::VolumeSample,
            duration: self.config.volume_interval(),
        }]
    }

    /// Stop producing arrivals.
    pub fn suspend(&mut self) -> Vec<Action> {
        self.suspended = true;
        vec![Action::CancelTimer {
            id: TimerId::TransactionArrival,
        }]
    }

    /// Restart arrivals with a fresh inter-arrival draw.
    pub fn resume(&mut self, rng: &mut impl Rng) -> Vec<Action> {
        self.suspended = false;
        vec![self.arrival_timer(rng)]
    }

    /// Cancel every timer the feed owns.
    pub fn on_shutdown(&mut self) -> Vec<Action> {
        self.suspended = true;
        vec![
            Action::CancelTimer {
                id: TimerId::TransactionArrival,
            },
            Action::CancelTimer {
                id: TimerId::VolumeSample,
            },
        ]
    }

    fn arrival_timer(&self, rng: &mut impl Rng) -> Action {
        Action::SetTimer {
            id: TimerId::TransactionArrival,
            duration: self.next_arrival_delay(rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use tracing_test::traced_test;

    fn feed() -> TransactionFeed {
        TransactionFeed::new(FeedConfig::default())
    }

    #[traced_test]
    #[test]
    fn test_windows_never_exceed_cap() {
        let mut feed = feed();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let controller = Some(Address([7; 20]));

        for k in 1..=200u64 {
            feed.on_arrival(controller, &mut rng);
            assert_eq!(feed.transactions().len(), (k as usize).min(50));
            assert!(feed.alerts().len() <= 5);
        }

        // Newest first, in insertion order
        let seqs: Vec<u64> = feed.transactions().iter().map(|tx| tx.sequence_number).collect();
        let expected: Vec<u64> = (151..=200).rev().collect();
        assert_eq!(seqs, expected);
        assert_eq!(feed.transaction_count(), 200);
    }

    #[traced_test]
    #[test]
    fn test_tagging_invariants_hold_for_feed() {
        let mut feed = feed();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        for i in 0..1_000 {
            let controller = (i % 2 == 0).then_some(Address([5; 20]));
            let tx = feed.fabricate(controller, &mut rng);
            if tx.timeboost {
                assert_eq!(tx.delay, Duration::ZERO);
                assert_eq!(Some(tx.from), controller);
            } else {
                assert_eq!(tx.delay, Duration::from_millis(200));
            }
            if controller.is_none() {
                assert!(!tx.timeboost);
            }
            assert_eq!(tx.round_controller, controller);
            assert!((21_000..121_000).contains(&tx.gas_used));
            if tx.status == TxStatus::Failed {
                assert!(tx.error.is_some());
            }
        }
    }

    #[traced_test]
    #[test]
    fn test_errors_raise_alerts() {
        let config = FeedConfig::default().with_confirmed_probability(0.0);
        let mut feed = TransactionFeed::new(config);
        let mut rng = ChaCha8Rng::seed_from_u64(9);

        let mut alerted = 0;
        for _ in 0..40 {
            let actions = feed.on_arrival(None, &mut rng);
            if actions
                .iter()
                .any(|a| matches!(a, Action::Notify(Notification::ErrorAlert(_))))
            {
                alerted += 1;
            }
        }

        // Half the non-confirmed transactions fail, and every failure alerts
        assert!(alerted > 0);
        assert_eq!(feed.alerts().len(), 5);
        assert!(feed.alerts().iter().all(|tx| tx.has_error()));
        let latest_error = feed.transactions().iter().find(|tx| tx.has_error()).unwrap();
        assert_eq!(feed.alerts().latest(), Some(latest_error));
    }

    #[traced_test]
    #[test]
    fn test_start_seeds_history() {
        let mut feed = feed();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let actions = feed.on_start(None, &mut rng);

        assert_eq!(feed.transactions().len(), 20);
        assert_eq!(feed.transaction_count(), 20);
        assert_eq!(feed.express_transaction_count(), 0);
        assert!(actions
            .iter()
            .all(|a| matches!(a, Action::SetTimer { .. })));
        assert!(actions.contains(&Action::SetTimer {
            id: TimerId::VolumeSample,
            duration: Duration::from_secs(60),
        }));
    }

    #[traced_test]
    #[test]
    fn test_start_seeds_configured_history() {
        let config = FeedConfig::default().with_initial_transactions(3);
        let mut feed = TransactionFeed::new(config);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        feed.on_start(None, &mut rng);
        assert_eq!(feed.transactions().len(), 3);

        let config = FeedConfig::default().with_initial_transactions(80);
        let mut feed = TransactionFeed::new(config);
        feed.on_start(None, &mut rng);
        assert_eq!(feed.transactions().len(), 50);
        assert_eq!(feed.transaction_count(), 80);
    }

    #[test]
    fn test_arrival_delay_in_range() {
        let feed = feed();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..1_000 {
            let delay = feed.next_arrival_delay(&mut rng);
            assert!(delay >= Duration::from_millis(1_000));
            assert!(delay <= Duration::from_millis(4_000));
        }
    }

    #[traced_test]
    #[test]
    fn test_suspend_stops_arrivals() {
        let mut feed = feed();
        let mut rng = ChaCha8Rng::seed_from_u64(6);

        assert_eq!(
            feed.suspend(),
            vec![Action::CancelTimer {
                id: TimerId::TransactionArrival
            }]
        );
        assert!(feed.on_arrival(None, &mut rng).is_empty());
        assert_eq!(feed.transaction_count(), 0);

        let actions = feed.resume(&mut rng);
        assert!(matches!(
            actions.as_slice(),
            [Action::SetTimer {
                id: TimerId::TransactionArrival,
                ..
            }]
        ));
        feed.on_arrival(None, &mut rng);
        assert_eq!(feed.transaction_count(), 1);
    }

    #[test]
    fn test_express_counter() {
        let config = FeedConfig::default().with_express_probability(1.0);
        let mut feed = TransactionFeed::new(config);
        let mut rng = ChaCha8Rng::seed_from_u64(8);

        for _ in 0..10 {
            let tx = feed.fabricate(Some(Address([2; 20])), &mut rng);
            feed.record(tx);
        }
        for _ in 0..5 {
            let tx = feed.fabricate(None, &mut rng);
            feed.record(tx);
        }
        assert_eq!(feed.transaction_count(), 15);
        assert_eq!(feed.express_transaction_count(), 10);
        assert_eq!(feed.volume().current().express, 10);
    }
}
