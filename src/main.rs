use anyhow::{Context, Result};
use clap::Parser;
use coinsim::cli::{Cli, OutputFormat};
use coinsim::csv_output::CsvOutput;
use coinsim::json_output::JsonReport;
use coinsim::text_output::TextOutput;
use coinsim::{Experiment, SimulatorConfig};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// File settings (or a preset) with command-line overrides on top
fn load_config(args: &Cli) -> Result<SimulatorConfig> {
    let base = match &args.config {
        Some(path) => SimulatorConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => args.preset.unwrap_or_default().config(),
    };
    Ok(args.apply_to(base))
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let config = load_config(&args)?;
    let experiment = Experiment::new(config).context("Invalid simulation parameters")?;
    let report = experiment.run()?;

    match args.format {
        OutputFormat::Text => {
            print!("{}", TextOutput::new(!args.no_chart).render(&report));
        }
        OutputFormat::Json => {
            let json = JsonReport::from_report(&report)
                .to_json_pretty()
                .context("Failed to serialize report")?;
            println!("{}", json);
        }
        OutputFormat::Csv => {
            print!("{}", CsvOutput::new(&report.biased).to_csv());
        }
    }

    if let Some(path) = &args.export {
        CsvOutput::new(&report.biased)
            .export(path)
            .with_context(|| format!("Failed to export CSV to {}", path.display()))?;
        eprintln!("Data exported to: {}", path.display());
    }

    Ok(())
}
