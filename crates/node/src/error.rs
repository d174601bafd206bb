//! Configuration errors.

use thiserror::Error;

/// A dashboard configuration that cannot be run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("round duration must be positive")]
    ZeroRoundDuration,

    #[error("closing threshold {threshold} must be below round duration {duration}")]
    ClosingThreshold { threshold: u32, duration: u32 },

    #[error("{name} must be positive")]
    ZeroInterval { name: &'static str },

    #[error("{name} window must hold at least one item")]
    EmptyWindow { name: &'static str },

    #[error("{name} must be within [0, 1], got {value}")]
    Probability { name: &'static str, value: f64 },

    #[error("arrival range is empty: min {min}ms > max {max}ms")]
    ArrivalRange { min: u64, max: u64 },

    #[error("gas range is empty: min {min} >= max {max}")]
    GasRange { min: u64, max: u64 },

    #[error("second price percent {0} exceeds 100")]
    SecondPricePercent(u64),
}
