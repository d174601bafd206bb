//! Bounded store of recent sealed bids.

use indexmap::IndexMap;
use timeboost_types::{Bid, BidId, RoundId};

/// Most recent bids across rounds, keyed by id.
///
/// Insertion order is preserved so eviction always drops the oldest bid.
/// Bids stay addressable by id until evicted, so a reveal is visible on the
/// same record a consumer looked up earlier.
#[derive(Debug)]
pub struct BidBook {
    bids: IndexMap<BidId, Bid>,
    capacity: usize,
}

impl BidBook {
    /// Create an empty book.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "BidBook capacity must be positive");
        Self {
            bids: IndexMap::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Record a bid, evicting the oldest one past capacity.
    pub fn insert(&mut self, bid: Bid) -> Option<Bid> {
        self.bids.insert(bid.id, bid);
        if self.bids.len() > self.capacity {
            self.bids.shift_remove_index(0).map(|(_, evicted)| evicted)
        } else {
            None
        }
    }

    /// Reveal every retained bid of a round. Returns how many flipped.
    ///
    /// Already revealed bids are left untouched.
    pub fn reveal_round(&mut self, round_id: RoundId) -> usize {
        let mut flipped = 0;
        for bid in self.bids.values_mut() {
            if bid.round_id == round_id && !bid.revealed {
                bid.revealed = true;
                flipped += 1;
            }
        }
        flipped
    }

    /// Look up a bid by id.
    pub fn get(&self, id: BidId) -> Option<&Bid> {
        self.bids.get(&id)
    }

    /// Most recently placed bid.
    pub fn latest(&self) -> Option<&Bid> {
        self.bids.last().map(|(_, bid)| bid)
    }

    /// Iterate newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &Bid> {
        self.bids.values().rev()
    }

    /// Bids of one round, newest first.
    pub fn for_round(&self, round_id: RoundId) -> impl Iterator<Item = &Bid> {
        self.iter().filter(move |bid| bid.round_id == round_id)
    }

    /// Copy the contents out, newest first.
    pub fn to_vec(&self) -> Vec<Bid> {
        self.iter().cloned().collect()
    }

    /// Number of retained bids.
    pub fn len(&self) -> usize {
        self.bids.len()
    }

    /// Check if the book is empty.
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty()
    }
}
