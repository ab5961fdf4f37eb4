//! CSV export of an empirical distribution
//!
//! Two columns: `index,probability`, one row per tails count. This is the
//! only artifact coinsim persists, so the layout stays fixed.

use crate::tabulation::EmpiricalDistribution;
use std::io::Write;
use std::path::Path;

/// Header row of the export
pub const CSV_HEADER: &str = "index,probability";

/// CSV output formatter
#[derive(Debug)]
pub struct CsvOutput<'a> {
    distribution: &'a EmpiricalDistribution,
}

impl<'a> CsvOutput<'a> {
    pub fn new(distribution: &'a EmpiricalDistribution) -> Self {
        Self { distribution }
    }

    /// Format one outcome as a CSV row
    fn format_row(index: usize, probability: f64) -> String {
        format!("{},{}", index, probability)
    }

    /// Generate CSV output as string
    pub fn to_csv(&self) -> String {
        let mut output = String::new();

        output.push_str(CSV_HEADER);
        output.push('\n');

        for (index, &probability) in self.distribution.probabilities().iter().enumerate() {
            output.push_str(&Self::format_row(index, probability));
            output.push('\n');
        }

        output
    }

    /// Write the CSV to `writer`
    pub fn write_to<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        writer.write_all(self.to_csv().as_bytes())?;
        writer.flush()
    }

    /// Write the CSV to a file, replacing it if it exists
    pub fn export(&self, path: &Path) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_to(std::io::BufWriter::new(file))
    }
}
