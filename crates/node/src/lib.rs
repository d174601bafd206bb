//! Combined dashboard state machine.
//!
//! This crate composes the round clock, auction simulator and transaction
//! feed into the single [`DashboardStateMachine`] a runner drives. It also
//! provides the two accessors a presentation layer needs: a read accessor
//! ([`DashboardView`]) and the pause command.

mod config;
mod error;
mod state;
mod stats;
mod view;

pub use config::DashboardConfig;
pub use error::ConfigError;
pub use state::{DashboardStateMachine, COSMETIC_SEED_SALT};
pub use stats::{RealTimeStats, StatsConfig};
pub use view::DashboardView;
