//! Simulator configuration
//!
//! Defaults match the classroom setup: 10 flips, 5 desired tails, a fair
//! coin and 100,000 trials per curve. Values can come from a TOML file and
//! be overridden from the command line.

use crate::error::{Result, SimulationError};
use crate::params::SimulationParameters;
use crate::sampler::validate_workers;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for one experiment
///
/// # Example
/// ```
/// use coinsim::SimulatorConfig;
///
/// let config = SimulatorConfig::from_toml_str("flips = 20\nbias = 0.3").unwrap();
/// assert_eq!(config.flips, 20);
/// assert_eq!(config.trials, 100_000); // default
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulatorConfig {
    /// Flips per trial
    pub flips: usize,

    /// Per-flip probability of a tail
    pub bias: f64,

    /// Trials per simulated curve
    pub trials: u64,

    /// Tails count whose probability is reported (must be <= flips)
    pub desired_tails: usize,

    /// Significance level (alpha) for the goodness-of-fit verdict
    ///
    /// - 0.05 (default): reject the binomial model when p < 0.05
    /// - 0.01: stricter, fewer false rejections
    pub significance_level: f64,

    /// Worker threads for the sampler (1 = run on the calling thread, at
    /// most `MAX_WORKERS`)
    pub workers: usize,

    /// Seed for reproducible runs; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            flips: 10,
            bias: 0.5,
            trials: 100_000,
            desired_tails: 5,
            significance_level: 0.05,
            workers: 1,
            seed: None,
        }
    }
}

impl SimulatorConfig {
    /// Quick runs for interactive exploration
    pub fn classroom() -> Self {
        Self {
            trials: 10_000,
            ..Self::default()
        }
    }

    /// Tighter estimates at a higher cost
    pub fn precise() -> Self {
        Self {
            trials: 1_000_000,
            workers: 4,
            significance_level: 0.01,
            ..Self::default()
        }
    }

    pub fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input).map_err(|e| SimulationError::Config(e.to_string()))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            SimulationError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.parameters()?;

        if self.desired_tails > self.flips {
            return Err(SimulationError::parameter(
                "desired_tails",
                format!(
                    "must be between 0 and number of flips ({}), got {}",
                    self.flips, self.desired_tails
                ),
            ));
        }

        if !(0.0..=1.0).contains(&self.significance_level) {
            return Err(SimulationError::parameter(
                "significance_level",
                format!("must be in [0, 1], got {}", self.significance_level),
            ));
        }

        validate_workers(self.workers)
    }

    /// Parameters of the biased run
    pub fn parameters(&self) -> Result<SimulationParameters> {
        SimulationParameters::new(self.flips, self.bias, self.trials)
    }
}
