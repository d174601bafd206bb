//! Simulated express lane auction.
//!
//! Models a second-price sealed-bid auction: bids arrive while a round is
//! bidding, stay sealed until the round closes, and the winner pays the
//! second-highest price rather than their own bid. Nothing here is real
//! cryptography; sealing is only a `revealed` flag.

mod book;
mod config;
mod simulator;

pub use book::BidBook;
pub use config::AuctionConfig;
pub use simulator::AuctionSimulator;
