//! Second-price auction simulation.

use crate::{AuctionConfig, BidBook};
use rand::Rng;
use std::time::Duration;
use timeboost_types::{Address, Bid, BidId, Gwei, Phase, Resolution, Round, RoundId};
use tracing::{debug, info};

/// Fabricates sealed bids and decides round outcomes.
///
/// The simulator has no clock of its own. The round clock calls
/// [`place_bid`](Self::place_bid) while a round is bidding,
/// [`resolve`](Self::resolve) when the countdown hits zero, and
/// [`reveal_round`](Self::reveal_round) as the round enters revealing.
pub struct AuctionSimulator {
    config: AuctionConfig,

    /// Recent bids across rounds.
    book: BidBook,

    /// Next bid id to allocate.
    next_bid_id: u64,

    /// Highest bid placed in the round currently taking bids.
    top_bid: Option<(RoundId, Gwei)>,
}

impl AuctionSimulator {
    /// Create a new auction simulator.
    pub fn new(config: AuctionConfig) -> Self {
        let book = BidBook::new(config.bid_window);
        Self {
            config,
            book,
            next_bid_id: 1,
            top_bid: None,
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &AuctionConfig {
        &self.config
    }

    /// Recent bids.
    pub fn book(&self) -> &BidBook {
        &self.book
    }

    /// Highest bid placed so far in `round_id`.
    pub fn top_bid(&self, round_id: RoundId) -> Option<Gwei> {
        match self.top_bid {
            Some((id, amount)) if id == round_id => Some(amount),
            _ => None,
        }
    }

    /// Fabricate a sealed bid for `round`.
    ///
    /// The amount is at least the current top bid (or the reserve price if
    /// there is none yet). Returns `None` unless the round is bidding.
    pub fn place_bid(&mut self, round: &Round, now: Duration, rng: &mut impl Rng) -> Option<Bid> {
        if round.phase != Phase::Bidding {
            debug!(round = %round.id, phase = %round.phase, "Not accepting bids");
            return None;
        }

        let floor = self
            .top_bid(round.id)
            .map_or(round.reserve_price, |top| top.max(round.reserve_price));
        let raise = Gwei(rng.gen_range(0..=self.config.max_bid_increment.get()));
        let amount = floor.saturating_add(raise);

        let id = BidId(self.next_bid_id);
        self.next_bid_id += 1;

        let bid = Bid::sealed(id, round.id, Address::random(rng), amount, now);
        self.top_bid = Some((round.id, amount));
        self.book.insert(bid.clone());

        debug!(
            round = %round.id,
            bid = %id,
            bidder = %bid.bidder.short(),
            amount = %amount,
            "Sealed bid placed"
        );

        Some(bid)
    }

    /// Decide the outcome of a round with the given reserve price.
    ///
    /// The winner is a fresh address and the winning bid is drawn
    /// independently of the bids seen. The second price is a fixed fraction
    /// of the winning bid floored at the reserve price, so
    /// `reserve_price <= second_highest_bid <= winning_bid` always holds.
    pub fn resolve(&self, reserve_price: Gwei, rng: &mut impl Rng) -> Resolution {
        let floor = self.config.min_winning_bid.max(reserve_price);
        let drawn = self.config.winning_bid_base.saturating_add(Gwei(
            rng.gen_range(0..=self.config.winning_bid_spread.get()),
        ));
        let winning_bid = drawn.max(floor);

        let second_highest_bid = winning_bid
            .scale(self.config.second_price_percent.min(100), 100)
            .max(reserve_price);

        debug_assert!(second_highest_bid <= winning_bid);
        debug_assert!(second_highest_bid >= reserve_price);

        Resolution {
            winner: Address::random(rng),
            winning_bid,
            second_highest_bid,
        }
    }

    /// Reveal all retained bids of a closed round.
    pub fn reveal_round(&mut self, round_id: RoundId) -> usize {
        let revealed = self.book.reveal_round(round_id);
        if self.top_bid.is_some_and(|(id, _)| id == round_id) {
            self.top_bid = None;
        }
        info!(round = %round_id, revealed, "Bids revealed");
        revealed
    }
}
