//! Entry points used by the presentation layer
//!
//! [`simulate`] and [`goodness_of_fit`] are the two core calls. [`Experiment`]
//! runs the whole comparison: the biased curve, the fair reference curve, the
//! goodness-of-fit of the biased sample against its binomial model, and the
//! probability of the desired tails count under each.

use crate::config::SimulatorConfig;
use crate::error::{Result, SimulationError};
use crate::params::SimulationParameters;
use crate::sampler::Sampler;
use crate::tabulation::{EmpiricalDistribution, OutcomeTabulation};
use crate::theory::{self, TheoreticalExpectation};
use crate::validator::{self, FitVerdict, GoodnessOfFitResult};
use rand::Rng;
use tracing::{info, warn};

/// Simulate `trial_count` trials with an OS-seeded random source
///
/// Fails with `InvalidParameter` before sampling if the parameters are out
/// of domain.
pub fn simulate(
    number_of_flips: usize,
    bias_probability: f64,
    trial_count: u64,
) -> Result<(EmpiricalDistribution, OutcomeTabulation)> {
    let params = SimulationParameters::new(number_of_flips, bias_probability, trial_count)?;
    Ok(Sampler::from_entropy().run(&params))
}

/// Simulate with an injected random source
///
/// # Example
/// ```
/// use coinsim::simulate_with;
/// use rand::SeedableRng;
///
/// let rng = rand::rngs::StdRng::seed_from_u64(1);
/// let (dist, tab) = simulate_with(rng, 0, 0.5, 25).unwrap();
/// assert_eq!(tab.counts(), &[25]);
/// assert_eq!(dist.probabilities(), &[1.0]);
///
/// assert!(coinsim::simulate(10, 1.5, 100).is_err());
/// ```
pub fn simulate_with<R: Rng>(
    rng: R,
    number_of_flips: usize,
    bias_probability: f64,
    trial_count: u64,
) -> Result<(EmpiricalDistribution, OutcomeTabulation)> {
    let params = SimulationParameters::new(number_of_flips, bias_probability, trial_count)?;
    Ok(Sampler::new(rng).run(&params))
}

/// Chi-square fit of `observed` against the binomial model for the given
/// parameters
///
/// Besides the validator's own checks, `observed` must cover exactly
/// `number_of_flips + 1` outcomes and record exactly `trial_count` trials.
pub fn goodness_of_fit(
    observed: &OutcomeTabulation,
    number_of_flips: usize,
    bias_probability: f64,
    trial_count: u64,
) -> Result<GoodnessOfFitResult> {
    let params = SimulationParameters::new(number_of_flips, bias_probability, trial_count)?;

    if observed.len() != params.outcome_count() {
        return Err(SimulationError::InvalidInput(format!(
            "tabulation has {} entries, expected {} for {} flips",
            observed.len(),
            params.outcome_count(),
            number_of_flips
        )));
    }
    if observed.total() != trial_count {
        return Err(SimulationError::InvalidInput(format!(
            "tabulation records {} trials, expected {}",
            observed.total(),
            trial_count
        )));
    }

    validator::fit(observed, &theory::expected(&params))
}

/// Goodness-of-fit as shown to the user
#[derive(Debug, Clone, PartialEq)]
pub enum FitOutcome {
    Computed {
        result: GoodnessOfFitResult,
        verdict: FitVerdict,
    },
    /// The model has degenerate expected frequencies (e.g. bias 0 or 1)
    Unavailable { reason: String },
}

/// Probability of the desired tails count under each curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DesiredTails {
    pub tails: usize,
    pub biased: f64,
    pub fair: f64,
    pub theoretical: f64,
}

/// Everything one experiment produces
#[derive(Debug, Clone)]
pub struct ExperimentReport {
    pub params: SimulationParameters,
    pub seed: Option<u64>,
    pub significance_level: f64,
    pub biased: EmpiricalDistribution,
    pub biased_counts: OutcomeTabulation,
    pub fair: EmpiricalDistribution,
    pub fair_counts: OutcomeTabulation,
    pub expected: TheoreticalExpectation,
    pub fit: FitOutcome,
    pub desired: DesiredTails,
    /// Total variation distance between the biased sample and its model
    pub total_variation: f64,
}

/// Biased-vs-fair comparison driven by a [`SimulatorConfig`]
#[derive(Debug, Clone)]
pub struct Experiment {
    config: SimulatorConfig,
}

impl Experiment {
    /// Validates the whole configuration up front
    pub fn new(config: SimulatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Run with the configured seed, or an OS-seeded source when unset
    pub fn run(&self) -> Result<ExperimentReport> {
        match self.config.seed {
            Some(seed) => self.run_on(Sampler::seeded(seed)),
            None => self.run_on(Sampler::from_entropy()),
        }
    }

    pub fn run_with<R: Rng>(&self, rng: R) -> Result<ExperimentReport> {
        self.run_on(Sampler::new(rng))
    }

    fn run_on<R: Rng>(&self, mut sampler: Sampler<R>) -> Result<ExperimentReport> {
        let params = self.config.parameters()?;
        let workers = self.config.workers;

        info!(
            flips = params.number_of_flips(),
            bias = params.bias_probability(),
            trials = params.trial_count(),
            workers,
            "running experiment"
        );

        let (biased, biased_counts) = sampler.run_parallel(&params, workers)?;
        let (fair, fair_counts) = sampler.run_parallel(&params.fair_reference(), workers)?;
        let expected = theory::expected(&params);

        let fit = match validator::fit(&biased_counts, &expected) {
            Ok(result) => FitOutcome::Computed {
                verdict: result.verdict(self.config.significance_level),
                result,
            },
            Err(e) => {
                warn!("goodness-of-fit unavailable: {}", e);
                FitOutcome::Unavailable {
                    reason: e.to_string(),
                }
            }
        };

        let total_variation = theory::total_variation(&biased, &expected)?;
        let desired = desired_tails(self.config.desired_tails, &biased, &fair, &expected)?;

        Ok(ExperimentReport {
            params,
            seed: self.config.seed,
            significance_level: self.config.significance_level,
            biased,
            biased_counts,
            fair,
            fair_counts,
            expected,
            fit,
            desired,
            total_variation,
        })
    }
}

fn desired_tails(
    tails: usize,
    biased: &EmpiricalDistribution,
    fair: &EmpiricalDistribution,
    expected: &TheoreticalExpectation,
) -> Result<DesiredTails> {
    let out_of_range = || {
        SimulationError::parameter(
            "desired_tails",
            format!("must be between 0 and {}, got {}", biased.len() - 1, tails),
        )
    };

    Ok(DesiredTails {
        tails,
        biased: biased.probability(tails).ok_or_else(out_of_range)?,
        fair: fair.probability(tails).ok_or_else(out_of_range)?,
        theoretical: expected.probability(tails).ok_or_else(out_of_range)?,
    })
}
