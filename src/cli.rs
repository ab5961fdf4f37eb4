//! CLI argument parsing for coinsim

use crate::config::SimulatorConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the experiment report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
    /// CSV of the biased distribution (index,probability)
    Csv,
}

/// Built-in starting configuration, used when no config file is given
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Preset {
    /// 100,000 trials, alpha 0.05
    #[default]
    Default,
    /// 10,000 trials for quick interactive runs
    Classroom,
    /// 1,000,000 trials on 4 workers, alpha 0.01
    Precise,
}

impl Preset {
    pub fn config(self) -> SimulatorConfig {
        match self {
            Preset::Default => SimulatorConfig::default(),
            Preset::Classroom => SimulatorConfig::classroom(),
            Preset::Precise => SimulatorConfig::precise(),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "coinsim")]
#[command(version)]
#[command(about = "Monte Carlo biased vs fair coin flip simulator with chi-square validation", long_about = None)]
pub struct Cli {
    /// Number of flips per trial
    #[arg(short = 'n', long = "flips", value_name = "N")]
    pub flips: Option<usize>,

    /// Probability of tails for the biased coin (0.0 to 1.0)
    #[arg(short = 'b', long = "bias", value_name = "P", allow_negative_numbers = true)]
    pub bias: Option<f64>,

    /// Number of trials per simulated curve
    #[arg(short = 't', long = "trials", value_name = "T")]
    pub trials: Option<u64>,

    /// Tails count whose probability is reported
    #[arg(short = 'k', long = "tails", value_name = "K")]
    pub desired_tails: Option<usize>,

    /// Seed for a reproducible run
    #[arg(short = 's', long = "seed", value_name = "SEED")]
    pub seed: Option<u64>,

    /// Worker threads for the sampler
    #[arg(short = 'w', long = "workers", value_name = "W")]
    pub workers: Option<usize>,

    /// Significance level for the goodness-of-fit verdict
    #[arg(long = "alpha", value_name = "ALPHA")]
    pub alpha: Option<f64>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Write the biased distribution as CSV to PATH
    #[arg(short = 'o', long = "export", value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Omit the bar chart from the text report
    #[arg(long = "no-chart")]
    pub no_chart: bool,

    /// Load settings from a TOML file (flags take precedence)
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Start from a built-in configuration (flags take precedence)
    #[arg(long = "preset", value_enum, conflicts_with = "config")]
    pub preset: Option<Preset>,

    /// Enable debug tracing to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Cli {
    /// Apply command-line overrides on top of `base`
    pub fn apply_to(&self, base: SimulatorConfig) -> SimulatorConfig {
        SimulatorConfig {
            flips: self.flips.unwrap_or(base.flips),
            bias: self.bias.unwrap_or(base.bias),
            trials: self.trials.unwrap_or(base.trials),
            desired_tails: self.desired_tails.unwrap_or(base.desired_tails),
            significance_level: self.alpha.unwrap_or(base.significance_level),
            workers: self.workers.unwrap_or(base.workers),
            seed: self.seed.or(base.seed),
        }
    }
}
