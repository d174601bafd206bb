//! Timeboost Dashboard Simulator
//!
//! Runs the dashboard headless, either in virtual time (a ten minute run
//! finishes instantly) or against the wall clock, and summarizes what
//! happened.
//!
//! # Example
//!
//! ```ignore
//! use timeboost_simulator::{Simulator, SimulatorConfig};
//! use std::time::Duration;
//!
//! let config = SimulatorConfig::default()
//!     .with_seed(7)
//!     .with_duration(Duration::from_secs(600));
//!
//! let report = Simulator::new(config)?.run();
//! println!("Rounds: {}", report.rounds.len());
//! println!("Express share: {:.1}%", report.express_share());
//! ```

pub mod config;
pub mod error;
pub mod report;
pub mod runner;

pub use config::SimulatorConfig;
pub use error::SimulatorError;
pub use report::{GasPercentiles, RoundSummary, SimulationReport};
pub use runner::Simulator;
