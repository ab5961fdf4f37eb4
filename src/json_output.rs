//! JSON output format for experiment reports

use crate::experiment::{ExperimentReport, FitOutcome};
use crate::validator::FitVerdict;
use serde::{Deserialize, Serialize};

/// One simulated curve
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonCurve {
    /// Per-flip probability of a tail
    pub bias: f64,
    /// Estimated probability per tails count
    pub probabilities: Vec<f64>,
    /// Trials per tails count
    pub counts: Vec<u64>,
}

/// Goodness-of-fit section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonFit {
    /// "computed" or "unavailable"
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistic: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degrees_of_freedom: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<FitVerdict>,
    /// Why the test could not run (degenerate expected frequencies)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub significance_level: f64,
}

/// Probability of the desired tails count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonDesiredTails {
    pub tails: usize,
    pub biased: f64,
    pub fair: f64,
    pub theoretical: f64,
}

/// Complete JSON document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    pub flips: usize,
    pub trials: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub desired_tails: JsonDesiredTails,
    pub biased: JsonCurve,
    pub fair: JsonCurve,
    /// Binomial probability per tails count for the biased coin
    pub theoretical: Vec<f64>,
    pub goodness_of_fit: JsonFit,
    pub total_variation: f64,
}

impl JsonReport {
    pub fn from_report(report: &ExperimentReport) -> Self {
        let goodness_of_fit = match &report.fit {
            FitOutcome::Computed { result, verdict } => JsonFit {
                status: "computed".to_string(),
                statistic: Some(result.statistic),
                p_value: Some(result.p_value),
                degrees_of_freedom: Some(result.degrees_of_freedom),
                verdict: Some(*verdict),
                reason: None,
                significance_level: report.significance_level,
            },
            FitOutcome::Unavailable { reason } => JsonFit {
                status: "unavailable".to_string(),
                statistic: None,
                p_value: None,
                degrees_of_freedom: None,
                verdict: None,
                reason: Some(reason.clone()),
                significance_level: report.significance_level,
            },
        };

        let fair_params = report.params.fair_reference();

        JsonReport {
            flips: report.params.number_of_flips(),
            trials: report.params.trial_count(),
            seed: report.seed,
            desired_tails: JsonDesiredTails {
                tails: report.desired.tails,
                biased: report.desired.biased,
                fair: report.desired.fair,
                theoretical: report.desired.theoretical,
            },
            biased: JsonCurve {
                bias: report.params.bias_probability(),
                probabilities: report.biased.probabilities().to_vec(),
                counts: report.biased_counts.counts().to_vec(),
            },
            fair: JsonCurve {
                bias: fair_params.bias_probability(),
                probabilities: report.fair.probabilities().to_vec(),
                counts: report.fair_counts.counts().to_vec(),
            },
            theoretical: report.expected.probabilities(),
            goodness_of_fit,
            total_variation: report.total_variation,
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
