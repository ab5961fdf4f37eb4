//! Monte Carlo sampler for biased coin flips
//!
//! Each trial draws `number_of_flips` uniforms u ∈ [0, 1) and counts a tail
//! whenever u < bias. The tails count of every trial is tabulated; dividing
//! by the trial count gives the empirical distribution.
//!
//! The random source is injected, so tests run against a seeded `StdRng`
//! and production runs against an entropy-seeded one.
//!
//! # Parallel runs
//!
//! [`Sampler::run_parallel`] splits the trials into batches. Every worker
//! owns a private `StdRng` (seeded from the injected source) and a private
//! tabulation; the tabulations are merged once all workers finish. Nothing
//! is shared between workers while they run.

use crate::error::{Result, SimulationError};
use crate::params::SimulationParameters;
use crate::tabulation::{EmpiricalDistribution, OutcomeTabulation};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;
use tracing::debug;

/// Upper bound on worker threads for [`Sampler::run_parallel`]
pub const MAX_WORKERS: usize = 256;

/// Biased coin sampler over an injected random source
#[derive(Debug, Clone)]
pub struct Sampler<R: Rng> {
    rng: R,
}

impl Sampler<StdRng> {
    /// Reproducible sampler
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Sampler seeded from the operating system
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> Sampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Run `trial_count` trials on the calling thread
    ///
    /// # Example
    /// ```
    /// use coinsim::{Sampler, SimulationParameters};
    ///
    /// let params = SimulationParameters::new(4, 0.0, 50).unwrap();
    /// let (dist, tab) = Sampler::seeded(7).run(&params);
    /// assert_eq!(tab.counts(), &[50, 0, 0, 0, 0]);
    /// assert_eq!(dist.probability(0), Some(1.0));
    /// ```
    pub fn run(
        &mut self,
        params: &SimulationParameters,
    ) -> (EmpiricalDistribution, OutcomeTabulation) {
        let start = Instant::now();
        let tabulation = tabulate(
            &mut self.rng,
            params.number_of_flips(),
            params.bias_probability(),
            params.trial_count(),
        );
        let distribution = tabulation.distribution_over(params.trial_count());

        debug!(
            flips = params.number_of_flips(),
            bias = params.bias_probability(),
            trials = params.trial_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "sampler run finished"
        );

        (distribution, tabulation)
    }

    /// Run the trials across `workers` scoped threads
    ///
    /// Output is deterministic for a given injected source and worker count.
    /// `workers == 1` is the same as [`Sampler::run`]. No more threads than
    /// trials are started.
    pub fn run_parallel(
        &mut self,
        params: &SimulationParameters,
        workers: usize,
    ) -> Result<(EmpiricalDistribution, OutcomeTabulation)> {
        validate_workers(workers)?;
        if workers == 1 {
            return Ok(self.run(params));
        }

        let start = Instant::now();
        let flips = params.number_of_flips();
        let bias = params.bias_probability();
        let batches: Vec<(u64, u64)> = split_trials(params.trial_count(), workers)
            .into_iter()
            .map(|trials| (trials, self.rng.gen::<u64>()))
            .collect();

        let partials: Vec<OutcomeTabulation> = crossbeam::thread::scope(|scope| {
            let handles: Vec<_> = batches
                .iter()
                .enumerate()
                .map(|(worker, &(trials, seed))| {
                    scope.spawn(move |_| {
                        debug!(worker, trials, "sampler worker started");
                        let mut rng = StdRng::seed_from_u64(seed);
                        tabulate(&mut rng, flips, bias, trials)
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                })
                .collect::<Vec<OutcomeTabulation>>()
        })
        .unwrap_or_else(|panic| std::panic::resume_unwind(panic));

        let tabulation = partials
            .iter()
            .try_fold(OutcomeTabulation::empty(flips), |acc, part| acc.merge(part))?;
        let distribution = tabulation.distribution_over(params.trial_count());

        debug!(
            flips,
            bias,
            trials = params.trial_count(),
            workers = batches.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "parallel sampler run finished"
        );

        Ok((distribution, tabulation))
    }
}

/// Tabulate `trials` trials of `flips` flips each
fn tabulate<R: Rng + ?Sized>(rng: &mut R, flips: usize, bias: f64, trials: u64) -> OutcomeTabulation {
    let mut tabulation = OutcomeTabulation::empty(flips);
    for _ in 0..trials {
        let tails = (0..flips).filter(|_| rng.gen::<f64>() < bias).count();
        tabulation.record(tails);
    }
    tabulation
}

/// Check that `workers` is in `1..=MAX_WORKERS`
pub fn validate_workers(workers: usize) -> Result<()> {
    if !(1..=MAX_WORKERS).contains(&workers) {
        return Err(SimulationError::parameter(
            "workers",
            format!("must be between 1 and {}, got {}", MAX_WORKERS, workers),
        ));
    }
    Ok(())
}

/// Split `trials` into at most `workers` non-empty batches
///
/// The remainder goes one trial each to the first batches.
fn split_trials(trials: u64, workers: usize) -> Vec<u64> {
    let workers = (workers as u64).min(trials).max(1);
    let base = trials / workers;
    let remainder = trials % workers;
    (0..workers)
        .map(|i| base + u64::from(i < remainder))
        .filter(|&batch| batch > 0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(flips: usize, bias: f64, trials: u64) -> SimulationParameters {
        SimulationParameters::new(flips, bias, trials).unwrap()
    }

    #[test]
    fn test_tabulation_sums_to_trials() {
        let (_, tab) = Sampler::seeded(1).run(&params(10, 0.3, 2_000));
        assert_eq!(tab.len(), 11);
        assert_eq!(tab.total(), 2_000);
    }

    #[test]
    fn test_distribution_sums_to_one() {
        let (dist, _) = Sampler::seeded(2).run(&params(8, 0.7, 3_000));
        assert!((dist.sum() - 1.0).abs() < 1e-9);
        assert!(dist.probabilities().iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_zero_bias_puts_all_mass_at_zero() {
        let (dist, tab) = Sampler::seeded(3).run(&params(6, 0.0, 400));
        assert_eq!(tab.counts(), &[400, 0, 0, 0, 0, 0, 0]);
        assert_eq!(dist.probability(0), Some(1.0));
    }

    #[test]
    fn test_full_bias_puts_all_mass_at_flips() {
        let (dist, tab) = Sampler::seeded(4).run(&params(6, 1.0, 400));
        assert_eq!(tab.counts(), &[0, 0, 0, 0, 0, 0, 400]);
        assert_eq!(dist.probability(6), Some(1.0));
    }

    #[test]
    fn test_zero_flips_single_bucket() {
        let (dist, tab) = Sampler::seeded(5).run(&params(0, 0.4, 123));
        assert_eq!(tab.counts(), &[123]);
        assert_eq!(dist.probabilities(), &[1.0]);
    }

    #[test]
    fn test_same_seed_same_tabulation() {
        let p = params(12, 0.45, 1_000);
        let (_, a) = Sampler::seeded(99).run(&p);
        let (_, b) = Sampler::seeded(99).run(&p);
        assert_eq!(a, b);
    }

    #[test]
    fn test_fair_coin_center_estimate() {
        // C(10,5) / 2^10 = 0.24609375
        let (dist, _) = Sampler::seeded(2024).run(&params(10, 0.5, 100_000));
        let p5 = dist.probability(5).unwrap();
        assert!((p5 - 0.246_093_75).abs() < 0.01, "p5 = {}", p5);
    }

    #[test]
    fn test_parallel_sums_to_trials() {
        let (dist, tab) = Sampler::seeded(11)
            .run_parallel(&params(9, 0.35, 10_001), 4)
            .unwrap();
        assert_eq!(tab.total(), 10_001);
        assert!((dist.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_parallel_is_deterministic_per_seed() {
        let p = params(7, 0.6, 5_000);
        let (_, a) = Sampler::seeded(8).run_parallel(&p, 3).unwrap();
        let (_, b) = Sampler::seeded(8).run_parallel(&p, 3).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_parallel_more_workers_than_trials() {
        let (_, tab) = Sampler::seeded(12)
            .run_parallel(&params(3, 0.5, 2), 8)
            .unwrap();
        assert_eq!(tab.total(), 2);
    }

    #[test]
    fn test_parallel_zero_workers_rejected() {
        let err = Sampler::seeded(13)
            .run_parallel(&params(3, 0.5, 10), 0)
            .unwrap_err();
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn test_parallel_degenerate_bias() {
        let (_, tab) = Sampler::seeded(14)
            .run_parallel(&params(4, 1.0, 1_000), 4)
            .unwrap();
        assert_eq!(tab.counts(), &[0, 0, 0, 0, 1_000]);
    }

    #[test]
    fn test_parallel_too_many_workers_rejected() {
        let err = Sampler::seeded(15)
            .run_parallel(&params(1, 0.5, 1), MAX_WORKERS + 1)
            .unwrap_err();
        assert!(err.is_invalid_parameter());
        assert!(err.to_string().contains("workers"));

        let err = Sampler::seeded(15)
            .run_parallel(&params(0, 0.5, 100_000), usize::MAX)
            .unwrap_err();
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn test_parallel_max_workers_few_trials() {
        let (dist, tab) = Sampler::seeded(16)
            .run_parallel(&params(1, 0.5, 1), MAX_WORKERS)
            .unwrap();
        assert_eq!(tab.total(), 1);
        assert!((dist.sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_split_trials_caps_batches_at_trials() {
        assert_eq!(split_trials(1, MAX_WORKERS), vec![1]);
        assert_eq!(split_trials(3, usize::MAX), vec![1, 1, 1]);
        assert_eq!(split_trials(0, 4), Vec::<u64>::new());
    }

    #[test]
    fn test_split_trials_spreads_remainder() {
        assert_eq!(split_trials(10, 3), vec![4, 3, 3]);
        assert_eq!(split_trials(9, 3), vec![3, 3, 3]);
        assert_eq!(split_trials(2, 5), vec![1, 1]);
    }
}
