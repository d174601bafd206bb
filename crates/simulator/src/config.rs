//! Configuration types for the simulator.

use crate::SimulatorError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use timeboost_clock::RolloverPolicy;
use timeboost_node::DashboardConfig;

/// Configuration for a simulation run.
///
/// Loaded from TOML; every field is optional:
///
/// ```toml
/// seed = 7
/// duration_ms = 600000
/// pause_at_ms = 30000
/// resume_at_ms = 90000
///
/// [dashboard.round]
/// rollover_policy = "hold-while-paused"
///
/// [dashboard.feed]
/// express_probability = 0.25
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Random seed for deterministic simulation.
    pub seed: u64,

    /// Simulated time to run for, in milliseconds.
    pub duration_ms: u64,

    /// Pause the dashboard at this time, in milliseconds.
    pub pause_at_ms: Option<u64>,

    /// Resume the dashboard at this time, in milliseconds.
    pub resume_at_ms: Option<u64>,

    /// Dashboard components.
    pub dashboard: DashboardConfig,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            duration_ms: 300_000,
            pause_at_ms: None,
            resume_at_ms: None,
            dashboard: DashboardConfig::default(),
        }
    }
}

impl SimulatorConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, SimulatorError> {
        Ok(toml::from_str(source)?)
    }

    /// Load a TOML file.
    pub fn load(path: &Path) -> Result<Self, SimulatorError> {
        let source = std::fs::read_to_string(path).map_err(|source| SimulatorError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the run length.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_ms = millis(duration);
        self
    }

    /// Set the rollover pause policy.
    pub fn with_rollover_policy(mut self, policy: RolloverPolicy) -> Self {
        self.dashboard.round.rollover_policy = policy;
        self
    }

    /// Pause at `pause_at`, optionally resuming at `resume_at`.
    pub fn with_pause_window(mut self, pause_at: Option<Duration>, resume_at: Option<Duration>) -> Self {
        self.pause_at_ms = pause_at.map(millis);
        self.resume_at_ms = resume_at.map(millis);
        self
    }

    /// Run length.
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Times at which the pause flag is toggled, in order.
    pub fn pause_toggles(&self) -> Result<Vec<Duration>, SimulatorError> {
        match (self.pause_at_ms, self.resume_at_ms) {
            (None, None) => Ok(vec![]),
            (Some(pause), None) => Ok(vec![Duration::from_millis(pause)]),
            (Some(pause), Some(resume)) if resume > pause => Ok(vec![
                Duration::from_millis(pause),
                Duration::from_millis(resume),
            ]),
            (pause, resume) => Err(SimulatorError::PauseWindow { pause, resume }),
        }
    }

    /// Check the dashboard and the pause window.
    pub fn validate(&self) -> Result<(), SimulatorError> {
        self.dashboard.validate()?;
        self.pause_toggles()?;
        Ok(())
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
