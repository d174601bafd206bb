//! Error types for round state access.

use thiserror::Error;

/// Errors when reading shared round state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// The reader outlived the round clock that owns the state.
    #[error("round state accessed outside its owning scope: the round clock has been dropped")]
    Detached,
}
