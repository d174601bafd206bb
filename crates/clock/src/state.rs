//! Round clock state machine.

use crate::{RolloverPolicy, RoundConfig, RoundReader, SharedRoundState, TICK_INTERVAL};
use rand::Rng;
use std::time::Duration;
use timeboost_auction::AuctionSimulator;
use timeboost_core::{Action, Notification, TimerId};
use timeboost_types::{Phase, Round, RoundId};
use tracing::{debug, info, warn};

/// A resolved round waiting for its reveal hold to elapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingRollover {
    /// Round that will be replaced.
    round_id: RoundId,

    /// When the rollover timer fires, if armed.
    deadline: Option<Duration>,

    /// Hold time left when the timer was suspended by a pause.
    suspended_remaining: Option<Duration>,
}

/// Drives the shared round through bidding, closing and revealing.
///
/// The clock is the only writer of the [`SharedRoundState`]. Each handler
/// works on a private copy of the round and publishes it as one snapshot
/// at the end, so readers never observe a partially updated round.
pub struct RoundClock {
    config: RoundConfig,

    /// Published round state.
    shared: SharedRoundState,

    /// Working copy of the current round.
    round: Round,

    /// Whether tick production is suspended.
    paused: bool,

    /// At most one finalize-then-replace cycle in flight.
    pending_rollover: Option<PendingRollover>,

    /// Rounds resolved since start.
    rounds_resolved: u64,

    /// Current simulation time.
    now: Duration,
}

impl RoundClock {
    /// Create a clock with its first round open for bidding.
    pub fn new(config: RoundConfig) -> Self {
        let round = Round::open(
            RoundId::FIRST,
            config.duration,
            config.closing_threshold,
            config.reserve_price,
            None,
        );
        Self {
            shared: SharedRoundState::new(round.clone()),
            config,
            round,
            paused: false,
            pending_rollover: None,
            rounds_resolved: 0,
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
    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    /// Read-only handle to the published round.
    pub fn reader(&self) -> RoundReader {
        self.shared.reader()
    }

    /// The current round.
    pub fn round(&self) -> &Round {
        &self.round
    }

    /// Whether the clock is paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Number of rounds resolved so far.
    pub fn rounds_resolved(&self) -> u64 {
        self.rounds_resolved
    }

    /// Whether a resolved round is waiting to be replaced.
    pub fn rollover_pending(&self) -> bool {
        self.pending_rollover.is_some()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Event Handlers
    // ═══════════════════════════════════════════════════════════════════════════

    /// Arm the tick timer and announce the first round.
    pub fn on_start(&mut self) -> Vec<Action> {
        info!(
            round = %self.round.id,
            duration = self.config.duration,
            "Round clock started"
        );

        let mut actions = vec![Action::Notify(Notification::RoundStarted {
            round_id: self.round.id,
            controller: self.round.controller,
        })];
        if !self.paused {
            actions.push(self.tick_timer());
        }
        actions
    }

    /// Advance the countdown by one tick.
    ///
    /// Decrements the countdown (floored at zero) and reclassifies the phase.
    /// On reaching zero the round is resolved, its bids revealed, and a
    /// rollover scheduled after the reveal hold. Otherwise, while bidding, a
    /// sealed bid arrives with the configured probability.
    pub fn on_tick(&mut self, auction: &mut AuctionSimulator, rng: &mut impl Rng) -> Vec<Action> {
        if self.paused {
            warn!("Round tick delivered while paused, ignoring");
            return vec![];
        }

        let mut actions = vec![self.tick_timer()];

        if self.round.is_resolved() {
            // Waiting out the reveal hold; the round is final
            self.round.next_round_starts_in = self.rollover_remaining_secs();
            self.shared.publish(self.round.clone());
            return actions;
        }

        let previous_phase = self.round.phase;
        self.round.time_remaining = self.round.time_remaining.saturating_sub(1);
        self.round.phase = Phase::classify(self.round.time_remaining, self.config.closing_threshold);
        self.round.next_round_starts_in = self.round.time_remaining;

        if self.round.phase != previous_phase {
            debug!(
                round = %self.round.id,
                phase = %self.round.phase,
                "Round phase changed"
            );
            actions.push(Action::Notify(Notification::PhaseChanged {
                round_id: self.round.id,
                phase: self.round.phase,
            }));
        }

        if self.round.time_remaining == 0 {
            actions.extend(self.finalize(auction, rng));
        } else if self.round.phase == Phase::Bidding && rng.gen_bool(self.config.bid_probability)
        {
            if let Some(bid) = auction.place_bid(&self.round, self.now, rng) {
                self.round.bid_count += 1;
                actions.push(Action::Notify(Notification::BidPlaced(bid)));
            }
        }

        self.shared.publish(self.round.clone());
        actions
    }

    /// Replace the resolved round with a fresh one.
    ///
    /// Ignored unless `round_id` is the round currently waiting for rollover.
    pub fn on_rollover(&mut self, round_id: RoundId) -> Vec<Action> {
        let Some(pending) = self.pending_rollover else {
            warn!(round = %round_id, "Rollover with no resolved round, ignoring");
            return vec![];
        };
        if pending.round_id != round_id || self.round.id != round_id {
            warn!(
                round = %round_id,
                current = %self.round.id,
                "Stale rollover, ignoring"
            );
            return vec![];
        }

        let controller = self.round.winner();
        self.pending_rollover = None;
        self.round = Round::open(
            round_id.next(),
            self.config.duration,
            self.config.closing_threshold,
            self.config.reserve_price,
            controller,
        );
        self.shared.publish(self.round.clone());

        info!(
            round = %self.round.id,
            controller = ?controller.map(|c| c.short()),
            paused = self.paused,
            "New round started"
        );

        vec![Action::Notify(Notification::RoundStarted {
            round_id: self.round.id,
            controller,
        })]
    }

    /// Flip the pause flag.
    ///
    /// Pausing cancels the tick timer, so no countdown progress happens at
    /// all while paused. Under [`RolloverPolicy::HoldWhilePaused`] a pending
    /// rollover is suspended too and re-armed with its remaining hold on
    /// resume.
    pub fn toggle_pause(&mut self) -> Vec<Action> {
        self.paused = !self.paused;
        info!(paused = self.paused, round = %self.round.id, "Round clock pause toggled");

        let hold_rollover = self.config.rollover_policy == RolloverPolicy::HoldWhilePaused;
        let mut actions = vec![];

        if self.paused {
            actions.push(Action::CancelTimer {
                id: TimerId::RoundTick,
            });
            if let Some(pending) = self.pending_rollover.as_mut().filter(|_| hold_rollover) {
                if let Some(deadline) = pending.deadline.take() {
                    let remaining = deadline.saturating_sub(self.now);
                    pending.suspended_remaining = Some(remaining);
                    debug!(round = %pending.round_id, ?remaining, "Rollover suspended");
                    actions.push(Action::CancelTimer {
                        id: TimerId::RoundRollover(pending.round_id),
                    });
                }
            }
        } else {
            actions.push(self.tick_timer());
            if let Some(pending) = self.pending_rollover.as_mut() {
                if let Some(remaining) = pending.suspended_remaining.take() {
                    pending.deadline = Some(self.now + remaining);
                    debug!(round = %pending.round_id, ?remaining, "Rollover resumed");
                    actions.push(Action::SetTimer {
                        id: TimerId::RoundRollover(pending.round_id),
                        duration: remaining,
                    });
                }
            }
        }

        actions.push(Action::Notify(Notification::PauseChanged {
            paused: self.paused,
        }));
        actions
    }

    /// Cancel every timer the clock owns.
    pub fn on_shutdown(&mut self) -> Vec<Action> {
        let mut actions = vec![Action::CancelTimer {
            id: TimerId::RoundTick,
        }];
        if let Some(pending) = self.pending_rollover.take() {
            actions.push(Action::CancelTimer {
                id: TimerId::RoundRollover(pending.round_id),
            });
        }
        actions
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Internals
    // ═══════════════════════════════════════════════════════════════════════════

    fn tick_timer(&self) -> Action {
        Action::SetTimer {
            id: TimerId::RoundTick,
            duration: TICK_INTERVAL,
        }
    }

    /// Resolve the auction and schedule the rollover.
    fn finalize(&mut self, auction: &mut AuctionSimulator, rng: &mut impl Rng) -> Vec<Action> {
        debug_assert!(self.pending_rollover.is_none(), "round finalized twice");

        let resolution = auction.resolve(self.round.reserve_price, rng);
        auction.reveal_round(self.round.id);

        let hold = self.config.reveal_hold();
        self.round.resolution = Some(resolution);
        self.round.next_round_starts_in = hold.as_secs() as u32;
        self.pending_rollover = Some(PendingRollover {
            round_id: self.round.id,
            deadline: Some(self.now + hold),
            suspended_remaining: None,
        });
        self.rounds_resolved += 1;

        info!(
            round = %self.round.id,
            winner = %resolution.winner.short(),
            winning_bid = %resolution.winning_bid,
            price = %resolution.second_highest_bid,
            bids = self.round.bid_count,
            "Round resolved"
        );

        vec![
            Action::Notify(Notification::RoundResolved {
                round_id: self.round.id,
                resolution,
                bid_count: self.round.bid_count,
            }),
            Action::SetTimer {
                id: TimerId::RoundRollover(self.round.id),
                duration: hold,
            },
        ]
    }

    /// Whole seconds until the pending rollover, rounded up.
    fn rollover_remaining_secs(&self) -> u32 {
        let remaining = match self.pending_rollover {
            Some(PendingRollover {
                deadline: Some(deadline),
                ..
            }) => deadline.saturating_sub(self.now),
            Some(PendingRollover {
                suspended_remaining: Some(remaining),
                ..
            }) => remaining,
            _ => Duration::ZERO,
        };
        remaining.as_millis().div_ceil(1_000) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use timeboost_auction::AuctionConfig;
    use timeboost_types::Gwei;
    use tracing_test::traced_test;

    struct Harness {
        clock: RoundClock,
        auction: AuctionSimulator,
        rng: ChaCha8Rng,
        now: Duration,
    }

    impl Harness {
        fn new(config: RoundConfig) -> Self {
            Self {
                clock: RoundClock::new(config),
                auction: AuctionSimulator::new(AuctionConfig::default()),
                rng: ChaCha8Rng::seed_from_u64(42),
                now: Duration::ZERO,
            }
        }

        fn tick(&mut self) -> Vec<Action> {
            self.now += Duration::from_secs(1);
            self.clock.set_time(self.now);
            self.clock.on_tick(&mut self.auction, &mut self.rng)
        }

        fn ticks(&mut self, n: u32) {
            for _ in 0..n {
                self.tick();
            }
        }
    }

    fn rollover_scheduled(actions: &[Action]) -> Option<(RoundId, Duration)> {
        actions.iter().find_map(|a| match a {
            Action::SetTimer {
                id: TimerId::RoundRollover(id),
                duration,
            } => Some((*id, *duration)),
            _ => None,
        })
    }

    #[traced_test]
    #[test]
    fn test_round_lifecycle() {
        let mut h = Harness::new(RoundConfig::default());
        let reader = h.clock.reader();

        let round = reader.snapshot();
        assert_eq!(round.time_remaining, 60);
        assert_eq!(round.phase, Phase::Bidding);

        h.ticks(45);
        let round = reader.snapshot();
        assert_eq!(round.time_remaining, 15);
        assert_eq!(round.phase, Phase::Closing);

        h.ticks(14);
        let actions = h.tick();
        let round = reader.snapshot();
        assert_eq!(round.time_remaining, 0);
        assert_eq!(round.phase, Phase::Revealing);
        let resolution = round.resolution.expect("resolved at zero");
        assert!(resolution.second_highest_bid <= resolution.winning_bid);
        assert!(resolution.second_highest_bid >= round.reserve_price);
        assert_eq!(
            rollover_scheduled(&actions),
            Some((round.id, Duration::from_secs(5)))
        );

        h.clock.on_rollover(round.id);
        let next = reader.snapshot();
        assert_ne!(next.id, round.id);
        assert_eq!(next.time_remaining, 60);
        assert_eq!(next.phase, Phase::Bidding);
        assert_eq!(next.bid_count, 0);
        assert_eq!(next.controller, Some(resolution.winner));
        assert!(next.resolution.is_none());
        assert!(next.express_lane_active());
    }

    #[traced_test]
    #[test]
    fn test_phase_matches_countdown_every_tick() {
        let mut h = Harness::new(RoundConfig::default());
        for _ in 0..70 {
            h.tick();
            let round = h.clock.round();
            assert_eq!(round.phase, Phase::classify(round.time_remaining, 15));
        }
    }

    #[traced_test]
    #[test]
    fn test_finalizes_once_per_round() {
        let mut h = Harness::new(RoundConfig::default());
        h.ticks(60);
        let resolved = h.clock.round().resolution;
        assert!(resolved.is_some());

        // Ticks during the reveal hold do not resolve again or reschedule
        for _ in 0..4 {
            let actions = h.tick();
            assert!(rollover_scheduled(&actions).is_none());
            assert_eq!(h.clock.round().resolution, resolved);
        }
        assert_eq!(h.clock.rounds_resolved(), 1);
        assert_eq!(h.clock.round().next_round_starts_in, 1);
    }

    #[traced_test]
    #[test]
    fn test_stale_rollover_ignored() {
        let mut h = Harness::new(RoundConfig::default());
        let first = h.clock.round().id;

        // Not resolved yet
        assert!(h.clock.on_rollover(first).is_empty());
        assert_eq!(h.clock.round().id, first);

        h.ticks(60);
        h.clock.on_rollover(first);
        let second = h.clock.round().id;

        // A duplicate rollover for the old round must not replace the new one
        assert!(h.clock.on_rollover(first).is_empty());
        assert_eq!(h.clock.round().id, second);
    }

    #[traced_test]
    #[test]
    fn test_bid_count_tracks_placed_bids() {
        let config = RoundConfig::default().with_bid_probability(1.0);
        let mut h = Harness::new(config);
        h.ticks(44);

        // One bid per bidding tick (t = 59..=16)
        let round = h.clock.round().clone();
        assert_eq!(round.bid_count, 44);
        let retained = h.auction.book().for_round(round.id).count() as u32;
        assert_eq!(retained, round.bid_count.min(10));

        // Closing phase accepts no bids
        h.ticks(10);
        assert_eq!(h.clock.round().bid_count, 44);
    }

    #[traced_test]
    #[test]
    fn test_bids_revealed_when_round_reveals() {
        let config = RoundConfig::default().with_bid_probability(1.0);
        let mut h = Harness::new(config);

        // Last bidding tick (t = 16); this bid is still in the window at reveal
        h.ticks(44);
        assert_eq!(h.clock.round().phase, Phase::Bidding);
        let bid_id = h.auction.book().latest().unwrap().id;
        assert!(!h.auction.book().get(bid_id).unwrap().revealed);

        h.ticks(16);
        assert_eq!(h.clock.round().phase, Phase::Revealing);
        assert!(h.auction.book().get(bid_id).unwrap().revealed);
        assert!(h
            .auction
            .book()
            .for_round(h.clock.round().id)
            .all(|bid| bid.revealed));
    }

    #[traced_test]
    #[test]
    fn test_reserve_price_floors_resolution() {
        let reserve = Gwei::from_milli_eth(100);
        let mut h = Harness::new(RoundConfig::default().with_reserve_price(reserve));
        assert_eq!(h.clock.round().reserve_price, reserve);

        h.ticks(60);
        let resolution = h.clock.round().resolution.unwrap();
        assert!(resolution.winning_bid >= reserve);
        assert_eq!(resolution.second_highest_bid, reserve.max(resolution.winning_bid.scale(80, 100)));

        // Every bid of the round met the reserve
        assert!(h
            .auction
            .book()
            .for_round(h.clock.round().id)
            .all(|bid| bid.amount >= reserve));
    }

    #[traced_test]
    #[test]
    fn test_countdown_and_reveal_hold_in_seconds() {
        let mut h = Harness::new(RoundConfig::default());
        let actions = h.tick();
        assert!(actions.contains(&Action::SetTimer {
            id: TimerId::RoundTick,
            duration: TICK_INTERVAL,
        }));

        // 60 one-second ticks resolve the round 60 s in
        h.ticks(59);
        assert_eq!(h.now, Duration::from_secs(60));
        assert_eq!(h.clock.round().time_remaining, 0);
        assert_eq!(h.clock.round().next_round_starts_in, 5);

        // The hold counts down in the same unit as the round
        for expected in [4, 3, 2, 1] {
            h.tick();
            assert_eq!(h.clock.round().next_round_starts_in, expected);
        }
    }

    #[traced_test]
    #[test]
    fn test_pause_cancels_ticks() {
        let mut h = Harness::new(RoundConfig::default());
        h.ticks(30);

        let actions = h.clock.toggle_pause();
        assert!(h.clock.is_paused());
        assert!(actions.contains(&Action::CancelTimer {
            id: TimerId::RoundTick
        }));

        // A late tick is ignored
        assert!(h.tick().is_empty());
        assert_eq!(h.clock.round().time_remaining, 30);

        let actions = h.clock.toggle_pause();
        assert!(!h.clock.is_paused());
        assert!(actions.contains(&Action::SetTimer {
            id: TimerId::RoundTick,
            duration: Duration::from_secs(1)
        }));
    }

    #[traced_test]
    #[test]
    fn test_hold_policy_suspends_rollover() {
        let config = RoundConfig::default().with_rollover_policy(RolloverPolicy::HoldWhilePaused);
        let mut h = Harness::new(config);
        h.ticks(60);
        let round_id = h.clock.round().id;

        // Pause two seconds into the five second hold
        h.now += Duration::from_secs(2);
        h.clock.set_time(h.now);
        let actions = h.clock.toggle_pause();
        assert!(actions.contains(&Action::CancelTimer {
            id: TimerId::RoundRollover(round_id)
        }));

        h.now += Duration::from_secs(100);
        h.clock.set_time(h.now);
        let actions = h.clock.toggle_pause();
        assert!(actions.contains(&Action::SetTimer {
            id: TimerId::RoundRollover(round_id),
            duration: Duration::from_secs(3)
        }));
        assert!(h.clock.rollover_pending());
    }

    #[traced_test]
    #[test]
    fn test_fire_policy_leaves_rollover_armed() {
        let mut h = Harness::new(RoundConfig::default());
        h.ticks(60);
        let round_id = h.clock.round().id;

        let actions = h.clock.toggle_pause();
        assert!(!actions.iter().any(|a| matches!(
            a,
            Action::CancelTimer {
                id: TimerId::RoundRollover(_)
            }
        )));

        // Rollover still happens while paused
        h.clock.on_rollover(round_id);
        assert_ne!(h.clock.round().id, round_id);
        assert!(h.clock.is_paused());
    }

    #[traced_test]
    #[test]
    fn test_shutdown_cancels_timers() {
        let mut h = Harness::new(RoundConfig::default());
        h.ticks(60);
        let round_id = h.clock.round().id;

        let actions = h.clock.on_shutdown();
        assert!(actions.contains(&Action::CancelTimer {
            id: TimerId::RoundTick
        }));
        assert!(actions.contains(&Action::CancelTimer {
            id: TimerId::RoundRollover(round_id)
        }));
        assert!(!h.clock.rollover_pending());
    }
}
