//! Core types for the Timeboost express lane auction dashboard.
//!
//! Everything here is plain data: rounds, bids, transactions and the
//! identifiers and amounts they carry. Behaviour lives in the state machine
//! crates.

mod amount;
mod bid;
pub mod display;
mod hash;
mod identifiers;
mod round;
mod transaction;
mod window;

pub use amount::Gwei;
pub use bid::Bid;
pub use hash::TxHash;
pub use identifiers::{Address, BidId, RoundId};
pub use round::{Phase, Resolution, Round};
pub use transaction::{Transaction, TxError, TxStatus};
pub use window::BoundedWindow;
