//! Validated parameters for a single simulation run

use crate::error::{Result, SimulationError};
use serde::Serialize;

/// Bias of a fair coin
pub const FAIR_BIAS: f64 = 0.5;

/// Parameters of one Monte Carlo run
///
/// Can only be built through [`SimulationParameters::new`], so a value of this
/// type always satisfies `bias_probability ∈ [0, 1]` and `trial_count ≥ 1`.
/// `number_of_flips` is unsigned and therefore never negative.
///
/// # Example
/// ```
/// use coinsim::SimulationParameters;
///
/// let params = SimulationParameters::new(10, 0.3, 1_000).unwrap();
/// assert_eq!(params.outcome_count(), 11);
/// assert!(SimulationParameters::new(10, 1.5, 1_000).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimulationParameters {
    number_of_flips: usize,
    bias_probability: f64,
    trial_count: u64,
}

impl SimulationParameters {
    pub fn new(number_of_flips: usize, bias_probability: f64, trial_count: u64) -> Result<Self> {
        validate_bias(bias_probability)?;

        if trial_count == 0 {
            return Err(SimulationError::parameter(
                "trial_count",
                "must be >= 1, got 0",
            ));
        }

        Ok(Self {
            number_of_flips,
            bias_probability,
            trial_count,
        })
    }

    /// Same flips and trials with a fair coin
    pub fn fair_reference(&self) -> Self {
        Self {
            bias_probability: FAIR_BIAS,
            ..*self
        }
    }

    pub fn number_of_flips(&self) -> usize {
        self.number_of_flips
    }

    pub fn bias_probability(&self) -> f64 {
        self.bias_probability
    }

    pub fn trial_count(&self) -> u64 {
        self.trial_count
    }

    /// Number of distinct tails counts (0..=number_of_flips)
    pub fn outcome_count(&self) -> usize {
        self.number_of_flips + 1
    }

    pub fn is_fair(&self) -> bool {
        self.bias_probability == FAIR_BIAS
    }
}

/// Check that `bias` is a probability. NaN is rejected.
pub fn validate_bias(bias: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&bias) {
        return Err(SimulationError::parameter(
            "bias_probability",
            format!("must be in [0, 1], got {}", bias),
        ));
    }
    Ok(())
}
