//! Human-readable experiment report
//!
//! Summary lines, a per-outcome table of the three curves, and an optional
//! horizontal bar chart comparing the biased and fair curves.

use crate::experiment::{ExperimentReport, FitOutcome};
use crate::validator::FitVerdict;

/// Width of the longest chart bar, in characters
const CHART_WIDTH: usize = 40;

/// Text output formatter
#[derive(Debug, Clone, Copy)]
pub struct TextOutput {
    include_chart: bool,
}

impl Default for TextOutput {
    fn default() -> Self {
        Self {
            include_chart: true,
        }
    }
}

impl TextOutput {
    pub fn new(include_chart: bool) -> Self {
        Self { include_chart }
    }

    pub fn render(&self, report: &ExperimentReport) -> String {
        let mut out = String::new();
        let params = &report.params;
        let desired = &report.desired;

        out.push_str(&format!(
            "Biased vs fair coin: {} flips, {} trials per curve (bias = {}{})\n",
            params.number_of_flips(),
            params.trial_count(),
            params.bias_probability(),
            if params.is_fair() { ", fair coin" } else { "" }
        ));
        if let Some(seed) = report.seed {
            out.push_str(&format!("Seed: {}\n", seed));
        }
        out.push('\n');

        out.push_str(&format!(
            "Biased P({k} tails): {:.4}   Fair P({k} tails): {:.4}   Binomial P({k} tails): {:.4}\n",
            desired.biased,
            desired.fair,
            desired.theoretical,
            k = desired.tails
        ));

        out.push_str(&format!(
            "Most likely tails count: biased {}, fair {}\n",
            report.biased.mode(),
            report.fair.mode()
        ));

        match &report.fit {
            FitOutcome::Computed { result, verdict } => {
                out.push_str(&format!(
                    "Chi-square p-value (bias vs theoretical): {:.4} (statistic {:.3}, df {})\n",
                    result.p_value, result.statistic, result.degrees_of_freedom
                ));
                let verdict_line = match verdict {
                    FitVerdict::Consistent => "consistent with the binomial model",
                    FitVerdict::Rejected => "deviates from the binomial model",
                };
                out.push_str(&format!(
                    "Verdict at alpha {}: {}\n",
                    report.significance_level, verdict_line
                ));
            }
            FitOutcome::Unavailable { reason } => {
                out.push_str(&format!("Chi-square test unavailable: {}\n", reason));
            }
        }
        out.push_str(&format!(
            "Total variation distance to binomial: {:.4}\n\n",
            report.total_variation
        ));

        out.push_str(&Self::table(report));

        if self.include_chart {
            out.push('\n');
            out.push_str(&Self::chart(report));
        }

        out
    }

    fn table(report: &ExperimentReport) -> String {
        let mut out = String::new();
        out.push_str(" tails    biased      fair  binomial\n");
        out.push_str("------ --------- --------- ---------\n");

        let expected = report.expected.probabilities();
        for (k, ((biased, fair), binomial)) in report
            .biased
            .probabilities()
            .iter()
            .zip(report.fair.probabilities())
            .zip(&expected)
            .enumerate()
        {
            out.push_str(&format!(
                "{:>6} {:>9.4} {:>9.4} {:>9.4}\n",
                k, biased, fair, binomial
            ));
        }
        out
    }

    fn chart(report: &ExperimentReport) -> String {
        let biased = report.biased.probabilities();
        let fair = report.fair.probabilities();
        let peak = biased
            .iter()
            .chain(fair)
            .fold(0.0_f64, |acc, &p| acc.max(p));

        let mut out = format!(
            "B = biased (p={}), F = fair (p=0.5)\n",
            report.params.bias_probability()
        );
        for (k, (&b, &f)) in biased.iter().zip(fair).enumerate() {
            out.push_str(&format!("{:>4} |{}\n", k, bar('B', b, peak)));
            out.push_str(&format!("     |{}\n", bar('F', f, peak)));
        }
        out
    }
}

fn bar(symbol: char, probability: f64, peak: f64) -> String {
    if peak <= 0.0 {
        return String::new();
    }
    let width = ((probability / peak) * CHART_WIDTH as f64).round() as usize;
    std::iter::repeat(symbol).take(width).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulatorConfig;
    use crate::experiment::Experiment;

    fn report(bias: f64) -> ExperimentReport {
        let config = SimulatorConfig {
            flips: 6,
            bias,
            trials: 2_000,
            desired_tails: 3,
            seed: Some(17),
            ..SimulatorConfig::default()
        };
        Experiment::new(config).unwrap().run().unwrap()
    }

    #[test]
    fn test_render_summary_lines() {
        let text = TextOutput::default().render(&report(0.3));
        assert!(text.contains("6 flips, 2000 trials per curve"));
        assert!(text.contains("Seed: 17"));
        assert!(text.contains("Biased P(3 tails):"));
        assert!(text.contains("Fair P(3 tails):"));
        assert!(text.contains("Chi-square p-value (bias vs theoretical):"));
        assert!(text.contains("Verdict at alpha 0.05"));
    }

    #[test]
    fn test_render_table_has_row_per_outcome() {
        let text = TextOutput::new(false).render(&report(0.3));
        let rows = text
            .lines()
            .skip_while(|line| !line.starts_with("------"))
            .skip(1)
            .count();
        assert_eq!(rows, 7);
        assert!(!text.contains("B = biased"));
    }

    #[test]
    fn test_render_chart() {
        let text = TextOutput::new(true).render(&report(0.3));
        assert!(text.contains("B = biased (p=0.3), F = fair (p=0.5)"));
        assert!(text.lines().any(|line| line.contains(&"B".repeat(CHART_WIDTH))
            || line.contains(&"F".repeat(CHART_WIDTH))));
    }

    #[test]
    fn test_render_mode_line() {
        let report = report(1.0);
        let text = TextOutput::default().render(&report);
        assert!(text.contains("Most likely tails count: biased 6, fair "));
        assert!(!text.contains("fair coin)"));
    }

    #[test]
    fn test_render_marks_fair_bias() {
        let text = TextOutput::new(false).render(&report(0.5));
        assert!(text.contains("(bias = 0.5, fair coin)"));
    }

    #[test]
    fn test_render_unavailable_fit() {
        let text = TextOutput::default().render(&report(1.0));
        assert!(text.contains("Chi-square test unavailable"));
    }

    #[test]
    fn test_bar_scaling() {
        assert_eq!(bar('B', 0.5, 0.5).len(), CHART_WIDTH);
        assert_eq!(bar('B', 0.25, 0.5).len(), CHART_WIDTH / 2);
        assert_eq!(bar('B', 0.0, 0.5), "");
        assert_eq!(bar('B', 0.1, 0.0), "");
    }
}
