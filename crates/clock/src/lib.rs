//! Round clock for the express lane auction.
//!
//! The [`RoundClock`] owns the single current round and moves it through
//! its phases once per tick:
//!
//! ```text
//!   Bidding ──(t <= 15)──▶ Closing ──(t == 0)──▶ Revealing
//!      ▲                                            │
//!      └───────── rollover after reveal hold ───────┘
//!                 (winner becomes controller)
//! ```
//!
//! Consumers read the round through a [`RoundReader`]; only the clock can
//! publish new snapshots.

mod config;
mod error;
mod shared;
mod state;

pub use config::{RolloverPolicy, RoundConfig, TICK_INTERVAL};
pub use error::StateError;
pub use shared::{RoundReader, SharedRoundState};
pub use state::RoundClock;
