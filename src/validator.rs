//! Chi-square goodness-of-fit between observed and expected counts
//!
//! statistic = Σ (O_k − E_k)² / E_k, compared against a chi-square
//! distribution with `len − 1` degrees of freedom. The p-value is the upper
//! tail (survival function) at the statistic:
//! - small p-value: the observed counts are unlikely under the binomial model
//! - large p-value: no evidence against the model
//!
//! Degenerate inputs (length mismatch, expected entries that are zero,
//! negative, or not finite) are rejected with `InvalidInput` instead of
//! producing an infinite or NaN statistic.

use crate::error::{Result, SimulationError};
use crate::tabulation::OutcomeTabulation;
use crate::theory::TheoreticalExpectation;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ChiSquared, ContinuousCDF};
use tracing::debug;

/// Result of a chi-square goodness-of-fit test
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GoodnessOfFitResult {
    /// Chi-square statistic (non-negative)
    pub statistic: f64,

    /// Upper-tail probability of the statistic, in [0, 1]
    pub p_value: f64,

    /// Number of categories minus one
    pub degrees_of_freedom: usize,
}

/// Outcome of comparing a p-value with a significance level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitVerdict {
    /// p-value >= alpha: the sample is consistent with the model
    Consistent,
    /// p-value < alpha: the sample deviates from the model
    Rejected,
}

impl GoodnessOfFitResult {
    /// Verdict at significance level `alpha` (e.g. 0.05)
    pub fn verdict(&self, alpha: f64) -> FitVerdict {
        if self.p_value < alpha {
            FitVerdict::Rejected
        } else {
            FitVerdict::Consistent
        }
    }
}

/// Chi-square goodness-of-fit of `observed` against `expected`
///
/// # Example
/// ```
/// use coinsim::{theory, validator, OutcomeTabulation};
///
/// let expected = theory::TheoreticalExpectation::from_expected_counts(vec![25.0, 50.0, 25.0]).unwrap();
/// let observed = OutcomeTabulation::from_counts(vec![25, 50, 25]).unwrap();
/// let result = validator::fit(&observed, &expected).unwrap();
/// assert_eq!(result.statistic, 0.0);
/// assert!((result.p_value - 1.0).abs() < 1e-12);
/// ```
pub fn fit(
    observed: &OutcomeTabulation,
    expected: &TheoreticalExpectation,
) -> Result<GoodnessOfFitResult> {
    if observed.len() != expected.len() {
        return Err(SimulationError::InvalidInput(format!(
            "observed has {} categories but expected has {}",
            observed.len(),
            expected.len()
        )));
    }

    if let Some((k, e)) = expected
        .expected_counts()
        .iter()
        .enumerate()
        .find(|(_, e)| !(e.is_finite() && **e > 0.0))
    {
        return Err(SimulationError::InvalidInput(format!(
            "expected frequency for {} tails is {}, must be positive and finite",
            k, e
        )));
    }

    let statistic: f64 = observed
        .counts()
        .iter()
        .zip(expected.expected_counts())
        .map(|(&o, &e)| {
            let diff = o as f64 - e;
            diff * diff / e
        })
        .sum();

    if !statistic.is_finite() {
        return Err(SimulationError::InvalidInput(format!(
            "chi-square statistic is not finite ({})",
            statistic
        )));
    }

    let degrees_of_freedom = observed.len() - 1;
    let p_value = survival(statistic, degrees_of_freedom)?;

    debug!(statistic, p_value, degrees_of_freedom, "goodness-of-fit computed");

    Ok(GoodnessOfFitResult {
        statistic,
        p_value,
        degrees_of_freedom,
    })
}

/// Chi-square upper tail; a single category (df = 0) carries no evidence
fn survival(statistic: f64, degrees_of_freedom: usize) -> Result<f64> {
    if degrees_of_freedom == 0 {
        return Ok(1.0);
    }
    let distribution = ChiSquared::new(degrees_of_freedom as f64)
        .map_err(|e| SimulationError::InvalidInput(format!("chi-square distribution: {}", e)))?;
    Ok(distribution.sf(statistic).clamp(0.0, 1.0))
}
