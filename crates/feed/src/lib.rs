//! Simulated transaction feed.
//!
//! The [`TransactionFeed`] fabricates transactions at random intervals and
//! tags each one with the [`ExpressLaneTagger`] against the controller of
//! the current round. Only the controller's own traffic skips the ordering
//! delay.

mod config;
mod feed;
mod tagger;
mod volume;

pub use config::FeedConfig;
pub use feed::TransactionFeed;
pub use tagger::{ExpressLaneTagger, Tagging};
pub use volume::{VolumeBucket, VolumeTracker};
