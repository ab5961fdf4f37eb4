//! Outcome tabulation and the empirical distribution derived from it
//!
//! A tabulation is a histogram over tails counts 0..=N. Tabulations of the
//! same length form a monoid under elementwise addition, which is what lets
//! parallel workers keep private histograms and reduce them at the end.

use crate::error::{Result, SimulationError};
use serde::Serialize;

/// Histogram of tails counts: index k holds the number of trials that
/// produced exactly k tails
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OutcomeTabulation {
    counts: Vec<u64>,
}

impl OutcomeTabulation {
    /// Identity element: all-zero tabulation for `number_of_flips` flips
    pub fn empty(number_of_flips: usize) -> Self {
        Self {
            counts: vec![0; number_of_flips + 1],
        }
    }

    /// Build from raw counts (e.g. counts loaded by a caller)
    ///
    /// An empty vector is rejected since every tabulation covers at least
    /// the k = 0 outcome.
    pub fn from_counts(counts: Vec<u64>) -> Result<Self> {
        if counts.is_empty() {
            return Err(SimulationError::InvalidInput(
                "tabulation must have at least one entry".to_string(),
            ));
        }
        Ok(Self { counts })
    }

    /// Record one trial that produced `tails` tails
    ///
    /// `tails` is bounded by the number of flips per trial, so the index is
    /// always in range for tabulations built by the sampler.
    pub(crate) fn record(&mut self, tails: usize) {
        self.counts[tails] += 1;
    }

    /// Elementwise sum of two tabulations over the same number of flips
    pub fn merge(mut self, other: &OutcomeTabulation) -> Result<Self> {
        if self.counts.len() != other.counts.len() {
            return Err(SimulationError::InvalidInput(format!(
                "cannot merge tabulations of length {} and {}",
                self.counts.len(),
                other.counts.len()
            )));
        }
        for (mine, theirs) in self.counts.iter_mut().zip(&other.counts) {
            *mine += theirs;
        }
        Ok(self)
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn number_of_flips(&self) -> usize {
        self.counts.len() - 1
    }

    /// Total number of trials recorded
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Normalize by the recorded total
    ///
    /// Fails on an all-zero tabulation, which has no distribution.
    pub fn to_distribution(&self) -> Result<EmpiricalDistribution> {
        let total = self.total();
        if total == 0 {
            return Err(SimulationError::InvalidInput(
                "cannot normalize a tabulation with no trials".to_string(),
            ));
        }
        Ok(self.distribution_over(total))
    }

    /// Divide every entry by `trial_count`
    pub(crate) fn distribution_over(&self, trial_count: u64) -> EmpiricalDistribution {
        let trials = trial_count as f64;
        EmpiricalDistribution {
            probabilities: self.counts.iter().map(|&c| c as f64 / trials).collect(),
        }
    }
}

/// Estimated probability of each tails count
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EmpiricalDistribution {
    probabilities: Vec<f64>,
}

impl EmpiricalDistribution {
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Probability of exactly `tails` tails, `None` past the last outcome
    pub fn probability(&self, tails: usize) -> Option<f64> {
        self.probabilities.get(tails).copied()
    }

    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    pub fn sum(&self) -> f64 {
        self.probabilities.iter().sum()
    }

    /// Tails count with the highest estimated probability (lowest k on ties)
    pub fn mode(&self) -> usize {
        let mut best = 0;
        for (k, &p) in self.probabilities.iter().enumerate() {
            if p > self.probabilities[best] {
                best = k;
            }
        }
        best
    }

    /// Mean number of tails under this distribution
    pub fn mean(&self) -> f64 {
        self.probabilities
            .iter()
            .enumerate()
            .map(|(k, p)| k as f64 * p)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_has_flips_plus_one_entries() {
        let tab = OutcomeTabulation::empty(4);
        assert_eq!(tab.len(), 5);
        assert_eq!(tab.number_of_flips(), 4);
        assert_eq!(tab.total(), 0);
    }

    #[test]
    fn test_record_increments_bucket() {
        let mut tab = OutcomeTabulation::empty(3);
        tab.record(2);
        tab.record(2);
        tab.record(0);
        assert_eq!(tab.counts(), &[1, 0, 2, 0]);
        assert_eq!(tab.total(), 3);
    }

    #[test]
    fn test_merge_is_elementwise() {
        let a = OutcomeTabulation::from_counts(vec![1, 2, 3]).unwrap();
        let b = OutcomeTabulation::from_counts(vec![4, 0, 1]).unwrap();
        let merged = a.merge(&b).unwrap();
        assert_eq!(merged.counts(), &[5, 2, 4]);
    }

    #[test]
    fn test_merge_with_identity() {
        let a = OutcomeTabulation::from_counts(vec![7, 1]).unwrap();
        let merged = a.clone().merge(&OutcomeTabulation::empty(1)).unwrap();
        assert_eq!(merged, a);
    }

    #[test]
    fn test_merge_length_mismatch() {
        let a = OutcomeTabulation::empty(2);
        let b = OutcomeTabulation::empty(3);
        assert!(a.merge(&b).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_from_counts_rejects_empty() {
        assert!(OutcomeTabulation::from_counts(vec![]).is_err());
    }

    #[test]
    fn test_to_distribution() {
        let tab = OutcomeTabulation::from_counts(vec![1, 2, 1]).unwrap();
        let dist = tab.to_distribution().unwrap();
        assert_eq!(dist.probabilities(), &[0.25, 0.5, 0.25]);
        assert_eq!(dist.sum(), 1.0);
        assert_eq!(dist.mode(), 1);
        assert_eq!(dist.mean(), 1.0);
    }

    #[test]
    fn test_to_distribution_rejects_zero_total() {
        assert!(OutcomeTabulation::empty(2).to_distribution().is_err());
    }

    #[test]
    fn test_probability_out_of_range_is_none() {
        let dist = OutcomeTabulation::from_counts(vec![3])
            .unwrap()
            .to_distribution()
            .unwrap();
        assert_eq!(dist.probability(0), Some(1.0));
        assert_eq!(dist.probability(1), None);
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let tab = OutcomeTabulation::from_counts(vec![2, 0, 5]).unwrap();
        assert_eq!(serde_json::to_string(&tab).unwrap(), "[2,0,5]");
    }
}
