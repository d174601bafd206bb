//! Simulator errors.

use thiserror::Error;
use timeboost_node::ConfigError;

/// Errors setting up or reporting on a simulation run.
#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML configuration")]
    Toml(#[from] toml::de::Error),

    #[error("invalid dashboard configuration")]
    Config(#[from] ConfigError),

    #[error("resume time {resume:?}ms must come after pause time {pause:?}ms")]
    PauseWindow {
        pause: Option<u64>,
        resume: Option<u64>,
    },

    #[error("failed to create gas histogram")]
    Histogram(#[from] hdrhistogram::CreationError),
}
