//! Single-writer, many-reader access to the current round.

use crate::StateError;
use arc_swap::ArcSwap;
use std::sync::{Arc, Weak};
use timeboost_types::{Address, Round};

/// Owner side of the current round.
///
/// Exactly one exists per dashboard and it is held by the round clock.
/// Every publish swaps in a whole new [`Round`] snapshot, so readers see
/// either the old round or the new one, never a mix.
#[derive(Debug)]
pub struct SharedRoundState {
    current: Arc<ArcSwap<Round>>,
}

impl SharedRoundState {
    /// Create the shared state with its initial round.
    pub fn new(initial: Round) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(initial)),
        }
    }

    /// Replace the current snapshot.
    pub fn publish(&self, round: Round) {
        self.current.store(Arc::new(round));
    }

    /// Current snapshot.
    pub fn load(&self) -> Arc<Round> {
        self.current.load_full()
    }

    /// Hand out a read-only view.
    pub fn reader(&self) -> RoundReader {
        RoundReader {
            current: Arc::downgrade(&self.current),
        }
    }
}

/// Read-only view of the current round.
///
/// Readers do not keep the state alive. Once the owning scope is torn down,
/// every access reports [`StateError::Detached`] instead of serving stale
/// data.
#[derive(Debug, Clone)]
pub struct RoundReader {
    current: Weak<ArcSwap<Round>>,
}

impl RoundReader {
    /// Current snapshot, or an error if the owner is gone.
    pub fn try_snapshot(&self) -> Result<Arc<Round>, StateError> {
        self.current
            .upgrade()
            .map(|current| current.load_full())
            .ok_or(StateError::Detached)
    }

    /// Current snapshot.
    ///
    /// # Panics
    ///
    /// Panics if the owning round clock has been dropped. Reading round
    /// state outside its owning scope is a programming error.
    pub fn snapshot(&self) -> Arc<Round> {
        match self.try_snapshot() {
            Ok(round) => round,
            Err(e) => panic!("{}", e),
        }
    }

    /// Express lane controller of the current round.
    pub fn controller(&self) -> Result<Option<Address>, StateError> {
        self.try_snapshot().map(|round| round.controller)
    }

    /// Whether the owning scope is still alive.
    pub fn is_attached(&self) -> bool {
        self.current.strong_count() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use timeboost_types::{Gwei, RoundId};

    fn round(id: u64) -> Round {
        Round::open(RoundId(id), 60, 15, Gwei::from_milli_eth(1), None)
    }

    #[test]
    fn test_readers_see_published_snapshots() {
        let state = SharedRoundState::new(round(1));
        let reader = state.reader();
        let before = reader.snapshot();

        state.publish(round(2));

        // An old snapshot is never mutated in place
        assert_eq!(before.id, RoundId(1));
        assert_eq!(reader.snapshot().id, RoundId(2));
        assert_eq!(state.load().id, RoundId(2));
        assert_eq!(reader.controller(), Ok(None));
    }

    #[test]
    fn test_reader_detached_after_owner_dropped() {
        let state = SharedRoundState::new(round(1));
        let reader = state.reader();
        assert!(reader.is_attached());

        drop(state);
        assert!(!reader.is_attached());
        assert_eq!(reader.try_snapshot(), Err(StateError::Detached));
    }

    #[test]
    #[should_panic(expected = "outside its owning scope")]
    fn test_snapshot_fails_fast_when_detached() {
        let reader = SharedRoundState::new(round(1)).reader();
        let _ = reader.snapshot();
    }
}
