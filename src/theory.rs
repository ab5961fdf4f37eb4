//! Theoretical binomial expectation
//!
//! Expected count for k tails is `trials × C(n, k) × p^k × (1 − p)^(n − k)`.
//! The coefficient is taken in log space (statrs `ln_binomial`), which keeps
//! flip counts in the thousands finite. Very small entries may underflow to
//! zero; the validator rejects those rather than dividing by them.

use crate::error::{Result, SimulationError};
use crate::params::{validate_bias, SimulationParameters};
use crate::tabulation::EmpiricalDistribution;
use serde::Serialize;
use statrs::function::factorial::ln_binomial;

/// Expected number of trials for each tails count
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TheoreticalExpectation {
    expected_counts: Vec<f64>,
    trial_count: f64,
}

impl TheoreticalExpectation {
    /// Wrap precomputed expected counts
    ///
    /// The trial count is taken as the sum of the entries, which must be
    /// positive and finite.
    pub fn from_expected_counts(expected_counts: Vec<f64>) -> Result<Self> {
        if expected_counts.is_empty() {
            return Err(SimulationError::InvalidInput(
                "expectation must have at least one entry".to_string(),
            ));
        }
        let trial_count: f64 = expected_counts.iter().sum();
        if !trial_count.is_finite() || trial_count <= 0.0 {
            return Err(SimulationError::InvalidInput(format!(
                "expected counts must sum to a positive finite total, got {}",
                trial_count
            )));
        }
        Ok(Self {
            expected_counts,
            trial_count,
        })
    }

    pub fn expected_counts(&self) -> &[f64] {
        &self.expected_counts
    }

    /// Expected count for exactly `tails` tails
    pub fn expected_count(&self, tails: usize) -> Option<f64> {
        self.expected_counts.get(tails).copied()
    }

    /// Binomial probability for exactly `tails` tails
    pub fn probability(&self, tails: usize) -> Option<f64> {
        self.expected_count(tails).map(|e| e / self.trial_count)
    }

    /// Binomial probability mass, one entry per tails count
    pub fn probabilities(&self) -> Vec<f64> {
        self.expected_counts
            .iter()
            .map(|e| e / self.trial_count)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.expected_counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expected_counts.is_empty()
    }
}

/// Expected counts for `params`; a pure function of the parameters
///
/// # Example
/// ```
/// use coinsim::{theory, SimulationParameters};
///
/// let params = SimulationParameters::new(2, 0.5, 100).unwrap();
/// let expectation = theory::expected(&params);
/// let counts = expectation.expected_counts();
/// assert!((counts[0] - 25.0).abs() < 1e-9);
/// assert!((counts[1] - 50.0).abs() < 1e-9);
/// ```
pub fn expected(params: &SimulationParameters) -> TheoreticalExpectation {
    let trials = params.trial_count() as f64;
    let expected_counts = pmf_row(params.number_of_flips(), params.bias_probability())
        .into_iter()
        .map(|p| p * trials)
        .collect();

    TheoreticalExpectation {
        expected_counts,
        trial_count: trials,
    }
}

/// P(exactly `tails` tails in `flips` flips) for a coin with tail
/// probability `bias`
pub fn binomial_pmf(flips: usize, bias: f64, tails: usize) -> Result<f64> {
    validate_bias(bias)?;
    if tails > flips {
        return Err(SimulationError::parameter(
            "tails",
            format!("must be between 0 and {}, got {}", flips, tails),
        ));
    }
    Ok(pmf_at(flips, bias, tails))
}

/// Total variation distance `½ Σ |p̂_k − p_k|` between an empirical
/// distribution and the binomial model
pub fn total_variation(
    empirical: &EmpiricalDistribution,
    theoretical: &TheoreticalExpectation,
) -> Result<f64> {
    if empirical.len() != theoretical.len() {
        return Err(SimulationError::InvalidInput(format!(
            "distribution has {} entries but expectation has {}",
            empirical.len(),
            theoretical.len()
        )));
    }

    let distance: f64 = empirical
        .probabilities()
        .iter()
        .zip(theoretical.probabilities())
        .map(|(observed, expected)| (observed - expected).abs())
        .sum();

    Ok(distance / 2.0)
}

fn pmf_row(flips: usize, bias: f64) -> Vec<f64> {
    (0..=flips).map(|k| pmf_at(flips, bias, k)).collect()
}

fn pmf_at(flips: usize, bias: f64, tails: usize) -> f64 {
    // Point masses: avoids 0 × ln(0)
    if bias == 0.0 {
        return if tails == 0 { 1.0 } else { 0.0 };
    }
    if bias == 1.0 {
        return if tails == flips { 1.0 } else { 0.0 };
    }

    let heads = flips - tails;
    // Evaluated at min(k, n − k) so C(n, k) and C(n, n − k) are bitwise equal
    let ln_coefficient = ln_binomial(flips as u64, tails.min(heads) as u64);
    let ln_weight = tails as f64 * bias.ln() + heads as f64 * (1.0 - bias).ln();

    (ln_coefficient + ln_weight).exp()
}
