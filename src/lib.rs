//! coinsim - Monte Carlo biased coin flip simulator
//!
//! Estimates the distribution of the number of tails in N flips of a biased
//! coin, compares it with a fair coin, and checks the biased sample against
//! its binomial model with a chi-square goodness-of-fit test.
//!
//! ```
//! use coinsim::{goodness_of_fit, simulate_with};
//! use rand::SeedableRng;
//!
//! let rng = rand::rngs::StdRng::seed_from_u64(42);
//! let (dist, counts) = simulate_with(rng, 10, 0.3, 10_000).unwrap();
//! assert_eq!(counts.total(), 10_000);
//! assert!((dist.sum() - 1.0).abs() < 1e-9);
//!
//! let fit = goodness_of_fit(&counts, 10, 0.3, 10_000).unwrap();
//! assert!((0.0..=1.0).contains(&fit.p_value));
//! ```

pub mod cli;
pub mod config;
pub mod csv_output;
pub mod error;
pub mod experiment;
pub mod json_output;
pub mod params;
pub mod sampler;
pub mod tabulation;
pub mod text_output;
pub mod theory;
pub mod validator;

pub use config::SimulatorConfig;
pub use error::{Result, SimulationError};
pub use experiment::{
    goodness_of_fit, simulate, simulate_with, DesiredTails, Experiment, ExperimentReport,
    FitOutcome,
};
pub use params::SimulationParameters;
pub use sampler::{Sampler, MAX_WORKERS};
pub use tabulation::{EmpiricalDistribution, OutcomeTabulation};
pub use theory::TheoreticalExpectation;
pub use validator::{FitVerdict, GoodnessOfFitResult};
