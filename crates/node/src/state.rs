//! Combined dashboard state machine.

use crate::{ConfigError, DashboardConfig, DashboardView, RealTimeStats, StatsConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;
use timeboost_auction::AuctionSimulator;
use timeboost_clock::{RoundClock, RoundReader};
use timeboost_core::{Action, Event, StateMachine, TimerId};
use timeboost_feed::TransactionFeed;
use timeboost_types::Address;
use tracing::{info, trace, warn};

/// Mixed into the seed to derive the cosmetic RNG stream.
pub const COSMETIC_SEED_SALT: u64 = 0x5EED_C05E_7100_0000;

/// The dashboard core: round clock, auction, transaction feed and stats.
///
/// Domain randomness (bids, outcomes, transactions) and cosmetic
/// randomness (stats jitter) come from separate streams of the same seed,
/// so jitter never shifts a simulated outcome.
pub struct DashboardStateMachine {
    clock: RoundClock,

    /// Read side of the round, used the same way external views use it.
    round: RoundReader,

    auction: AuctionSimulator,
    feed: TransactionFeed,

    stats: RealTimeStats,
    stats_config: StatsConfig,

    /// Domain randomness.
    rng: ChaCha8Rng,

    /// Cosmetic randomness.
    cosmetic_rng: ChaCha8Rng,

    started: bool,
    shut_down: bool,

    /// Current simulation time.
    now: Duration,
}

impl std::fmt::Debug for DashboardStateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardStateMachine")
            .field("round", &self.clock.round().id)
            .field("paused", &self.clock.is_paused())
            .field("started", &self.started)
            .field("shut_down", &self.shut_down)
            .field("now", &self.now)
            .finish()
    }
}

impl DashboardStateMachine {
    /// Create a dashboard from a validated configuration.
    pub fn new(config: DashboardConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let clock = RoundClock::new(config.round);
        let round = clock.reader();
        Ok(Self {
            clock,
            round,
            auction: AuctionSimulator::new(config.auction),
            feed: TransactionFeed::new(config.feed),
            stats: RealTimeStats::default(),
            stats_config: config.stats,
            rng: ChaCha8Rng::seed_from_u64(seed),
            cosmetic_rng: ChaCha8Rng::seed_from_u64(seed ^ COSMETIC_SEED_SALT),
            started: false,
            shut_down: false,
            now: Duration::ZERO,
        })
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Accessors
    // ═══════════════════════════════════════════════════════════════════════════

    /// The round clock.
    pub fn clock(&self) -> &RoundClock {
        &self.clock
    }

    /// A read-only handle to the current round.
    pub fn round_reader(&self) -> RoundReader {
        self.clock.reader()
    }

    /// The auction simulator.
    pub fn auction(&self) -> &AuctionSimulator {
        &self.auction
    }

    /// The transaction feed.
    pub fn feed(&self) -> &TransactionFeed {
        &self.feed
    }

    /// Cosmetic statistics.
    pub fn stats(&self) -> &RealTimeStats {
        &self.stats
    }

    /// Whether progression is paused.
    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    /// Whether the dashboard has been shut down.
    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Capture everything a view renders.
    pub fn view(&self) -> DashboardView {
        DashboardView {
            now: self.now,
            round: self.clock.round().clone(),
            paused: self.clock.is_paused(),
            transactions: self.feed.transactions().to_vec(),
            bids: self.auction.book().to_vec(),
            alerts: self.feed.alerts().to_vec(),
            transaction_count: self.feed.transaction_count(),
            express_transaction_count: self.feed.express_transaction_count(),
            rounds_resolved: self.clock.rounds_resolved(),
            volume: self.feed.volume().closed(),
            stats: self.stats.clone(),
        }
    }

    /// Flip the pause flag.
    pub fn toggle_pause(&mut self) -> Vec<Action> {
        self.handle(Event::TogglePause)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Event Handlers
    // ═══════════════════════════════════════════════════════════════════════════

    fn on_start(&mut self) -> Vec<Action> {
        if self.started {
            warn!("Dashboard already started, ignoring");
            return vec![];
        }
        self.started = true;

        let controller = self.controller();
        let mut actions = self.clock.on_start();
        actions.extend(self.feed.on_start(controller, &mut self.rng));
        if !self.clock.is_paused() {
            actions.push(self.stats_timer());
        }

        info!(
            round = %self.clock.round().id,
            seeded = self.feed.transaction_count(),
            "Dashboard started"
        );
        actions
    }

    fn on_shutdown(&mut self) -> Vec<Action> {
        self.shut_down = true;

        let mut actions = self.clock.on_shutdown();
        actions.extend(self.feed.on_shutdown());
        actions.push(Action::CancelTimer {
            id: TimerId::StatsJitter,
        });

        info!(
            rounds = self.clock.rounds_resolved(),
            transactions = self.feed.transaction_count(),
            "Dashboard shut down"
        );
        actions
    }

    fn on_toggle_pause(&mut self) -> Vec<Action> {
        let mut actions = self.clock.toggle_pause();
        if self.clock.is_paused() {
            actions.extend(self.feed.suspend());
            actions.push(Action::CancelTimer {
                id: TimerId::StatsJitter,
            });
        } else {
            actions.extend(self.feed.resume(&mut self.rng));
            actions.push(self.stats_timer());
        }
        actions
    }

    fn on_stats_jitter(&mut self) -> Vec<Action> {
        if self.clock.is_paused() {
            return vec![];
        }
        self.stats.jitter(&mut self.cosmetic_rng);
        vec![self.stats_timer()]
    }

    /// Controller of the published round.
    fn controller(&self) -> Option<Address> {
        self.round.snapshot().controller
    }

    fn stats_timer(&self) -> Action {
        Action::SetTimer {
            id: TimerId::StatsJitter,
            duration: self.stats_config.jitter_interval(),
        }
    }
}

impl StateMachine for DashboardStateMachine {
    fn handle(&mut self, event: Event) -> Vec<Action> {
        if self.shut_down {
            warn!(event = event.type_name(), "Event after shutdown, ignoring");
            return vec![];
        }

        trace!(event = event.type_name(), now = ?self.now, "Handling event");
        match event {
            Event::Start => self.on_start(),
            Event::Shutdown => self.on_shutdown(),
            Event::RoundTick => self.clock.on_tick(&mut self.auction, &mut self.rng),
            Event::RoundRollover { round_id } => self.clock.on_rollover(round_id),
            Event::TransactionArrival => {
                let controller = self.controller();
                self.feed.on_arrival(controller, &mut self.rng)
            }
            Event::StatsJitter => self.on_stats_jitter(),
            Event::VolumeSample => self.feed.on_volume_sample(),
            Event::TogglePause => self.on_toggle_pause(),
        }
    }

    fn set_time(&mut self, now: Duration) {
        self.now = now;
        self.clock.set_time(now);
        self.feed.set_time(now);
    }

    fn now(&self) -> Duration {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timeboost_core::Notification;
    use timeboost_types::Phase;
    use tracing_test::traced_test;

    fn dashboard(seed: u64) -> DashboardStateMachine {
        DashboardStateMachine::new(DashboardConfig::default(), seed).unwrap()
    }

    fn timers_set(actions: &[Action]) -> Vec<TimerId> {
        actions
            .iter()
            .filter_map(|a| match a {
                Action::SetTimer { id, .. } => Some(*id),
                _ => None,
            })
            .collect()
    }

    fn timers_cancelled(actions: &[Action]) -> Vec<TimerId> {
        actions
            .iter()
            .filter_map(|a| match a {
                Action::CancelTimer { id } => Some(*id),
                _ => None,
            })
            .collect()
    }

    #[traced_test]
    #[test]
    fn test_start_arms_all_timers() {
        let mut node = dashboard(1);
        let actions = node.handle(Event::Start);
        let timers = timers_set(&actions);

        for id in [
            TimerId::RoundTick,
            TimerId::TransactionArrival,
            TimerId::StatsJitter,
            TimerId::VolumeSample,
        ] {
            assert!(timers.contains(&id), "missing {}", id);
        }
        assert_eq!(node.view().transactions.len(), 20);

        // Second start is a no-op
        assert!(node.handle(Event::Start).is_empty());
    }

    #[traced_test]
    #[test]
    fn test_pause_suspends_every_producer() {
        let mut node = dashboard(2);
        node.handle(Event::Start);

        let actions = node.toggle_pause();
        let cancelled = timers_cancelled(&actions);
        assert!(cancelled.contains(&TimerId::RoundTick));
        assert!(cancelled.contains(&TimerId::TransactionArrival));
        assert!(cancelled.contains(&TimerId::StatsJitter));
        assert!(actions.contains(&Action::Notify(Notification::PauseChanged { paused: true })));
        assert!(node.view().paused);

        // Stray deliveries while paused change nothing
        let before = node.view();
        assert!(node.handle(Event::RoundTick).is_empty());
        assert!(node.handle(Event::TransactionArrival).is_empty());
        assert!(node.handle(Event::StatsJitter).is_empty());
        assert_eq!(node.view(), before);

        let actions = node.toggle_pause();
        let timers = timers_set(&actions);
        assert!(timers.contains(&TimerId::RoundTick));
        assert!(timers.contains(&TimerId::TransactionArrival));
        assert!(timers.contains(&TimerId::StatsJitter));
        assert!(!node.view().paused);
    }

    #[traced_test]
    #[test]
    fn test_shutdown_cancels_and_goes_inert() {
        let mut node = dashboard(3);
        node.handle(Event::Start);
        let actions = node.handle(Event::Shutdown);
        let cancelled = timers_cancelled(&actions);
        for id in [
            TimerId::RoundTick,
            TimerId::TransactionArrival,
            TimerId::StatsJitter,
            TimerId::VolumeSample,
        ] {
            assert!(cancelled.contains(&id), "not cancelled: {}", id);
        }
        assert!(node.is_shut_down());
        assert!(node.handle(Event::RoundTick).is_empty());
    }

    #[traced_test]
    #[test]
    fn test_transactions_copy_controller() {
        let mut node = dashboard(4);
        node.handle(Event::Start);

        // Run the first round to its end and roll it over
        for second in 1..=60 {
            node.set_time(Duration::from_secs(second));
            node.handle(Event::RoundTick);
        }
        let resolved = node.view().round;
        assert_eq!(resolved.phase, Phase::Revealing);
        let winner = resolved.winner().unwrap();

        node.set_time(Duration::from_secs(65));
        node.handle(Event::RoundRollover {
            round_id: resolved.id,
        });
        assert_eq!(node.view().round.controller, Some(winner));

        for _ in 0..50 {
            node.handle(Event::TransactionArrival);
        }
        let view = node.view();
        assert!(view
            .transactions
            .iter()
            .take(50)
            .all(|tx| tx.round_controller == Some(winner)));
        assert!(view
            .transactions
            .iter()
            .filter(|tx| tx.timeboost)
            .all(|tx| tx.from == winner && tx.delay == Duration::ZERO));
    }

    #[test]
    fn test_cosmetic_stream_does_not_touch_domain() {
        let mut plain = dashboard(5);
        let mut jittered = dashboard(5);
        plain.handle(Event::Start);
        jittered.handle(Event::Start);

        for _ in 0..25 {
            jittered.handle(Event::StatsJitter);
        }
        for second in 1..=60 {
            plain.set_time(Duration::from_secs(second));
            jittered.set_time(Duration::from_secs(second));
            plain.handle(Event::RoundTick);
            jittered.handle(Event::RoundTick);
            plain.handle(Event::TransactionArrival);
            jittered.handle(Event::TransactionArrival);
        }

        let (a, b) = (plain.view(), jittered.view());
        assert_eq!(a.round, b.round);
        assert_eq!(a.transactions, b.transactions);
        assert_eq!(a.bids, b.bids);
        assert_ne!(a.stats, b.stats);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = DashboardConfig::default();
        config.feed.alert_window = 0;
        assert!(matches!(
            DashboardStateMachine::new(config, 0),
            Err(ConfigError::EmptyWindow { name: "alert" })
        ));
    }
}
