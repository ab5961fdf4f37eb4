//! Statistical behaviour of the sampler on fixed scenarios
//!
//! These use seeded runs so every assertion is reproducible; tolerances are
//! wide enough that the chosen seeds are not special.

use coinsim::theory::{self, total_variation};
use coinsim::{goodness_of_fit, simulate_with, Sampler, SimulationParameters};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Mean total-variation distance to the binomial model over `runs` seeds
fn mean_distance(flips: usize, bias: f64, trials: u64, runs: u64) -> f64 {
    let params = SimulationParameters::new(flips, bias, trials).unwrap();
    let expected = theory::expected(&params);
    let total: f64 = (0..runs)
        .map(|seed| {
            let (dist, _) = Sampler::seeded(1_000 + seed).run(&params);
            total_variation(&dist, &expected).unwrap()
        })
        .sum();
    total / runs as f64
}

/// Mean distance shrinks as trials grow (law of large numbers)
#[test]
fn test_mean_distance_decreases_with_trials() {
    let d100 = mean_distance(10, 0.3, 100, 20);
    let d1k = mean_distance(10, 0.3, 1_000, 20);
    let d10k = mean_distance(10, 0.3, 10_000, 20);
    let d100k = mean_distance(10, 0.3, 100_000, 5);

    assert!(d100 > d1k, "{} vs {}", d100, d1k);
    assert!(d1k > d10k, "{} vs {}", d1k, d10k);
    assert!(d10k > d100k, "{} vs {}", d10k, d100k);
    assert!(d100k < 0.01, "distance at 100k trials: {}", d100k);
}

/// flips=10, bias=0.5, trials=100000: P(5 tails) ≈ C(10,5)/2^10 = 0.2461
#[test]
fn test_fair_coin_five_of_ten() {
    let rng = StdRng::seed_from_u64(20_240_601);
    let (dist, tab) = simulate_with(rng, 10, 0.5, 100_000).unwrap();
    let p5 = dist.probability(5).unwrap();
    assert!((p5 - 0.2461).abs() < 0.01, "P(5) = {}", p5);
    assert_eq!(tab.total(), 100_000);
    assert!((dist.mean() - 5.0).abs() < 0.05, "mean = {}", dist.mean());
}

#[test]
fn test_zero_flips() {
    let rng = StdRng::seed_from_u64(1);
    let (dist, tab) = simulate_with(rng, 0, 0.7, 4_321).unwrap();
    assert_eq!(tab.counts(), &[4_321]);
    assert_eq!(dist.probabilities(), &[1.0]);

    let fit = goodness_of_fit(&tab, 0, 0.7, 4_321).unwrap();
    assert_eq!(fit.statistic, 0.0);
    assert_eq!(fit.p_value, 1.0);
}

#[test]
fn test_invalid_bias_produces_no_tabulation() {
    let rng = StdRng::seed_from_u64(1);
    let err = simulate_with(rng, 10, 1.5, 100_000).unwrap_err();
    assert!(err.is_invalid_parameter());
}

/// The biased coin should usually pass against its own model and fail
/// against the fair one
#[test]
fn test_fit_distinguishes_models() {
    let rng = StdRng::seed_from_u64(77);
    let (_, tab) = simulate_with(rng, 12, 0.35, 50_000).unwrap();

    let own = goodness_of_fit(&tab, 12, 0.35, 50_000).unwrap();
    let fair = goodness_of_fit(&tab, 12, 0.5, 50_000).unwrap();

    assert!(own.p_value > 0.001, "own model p = {}", own.p_value);
    assert!(fair.p_value < 1e-6, "fair model p = {}", fair.p_value);
    assert!(fair.statistic > own.statistic);
}

/// p-values of a correct model are roughly uniform, so about 5% of runs
/// fall under 0.05
#[test]
fn test_rejection_rate_near_alpha() {
    let params = SimulationParameters::new(6, 0.4, 2_000).unwrap();
    let expected = theory::expected(&params);
    let runs = 200;
    let rejected = (0..runs)
        .filter(|&seed| {
            let (_, tab) = Sampler::seeded(seed).run(&params);
            coinsim::validator::fit(&tab, &expected).unwrap().p_value < 0.05
        })
        .count();

    // Binomial(200, 0.05): mean 10, sd ~3.1
    assert!(rejected <= 25, "rejected {} of {}", rejected, runs);
}

#[test]
fn test_parallel_matches_theory() {
    let params = SimulationParameters::new(15, 0.6, 60_000).unwrap();
    let (dist, _) = Sampler::seeded(5).run_parallel(&params, 4).unwrap();
    let distance = total_variation(&dist, &theory::expected(&params)).unwrap();
    assert!(distance < 0.02, "distance = {}", distance);
}
