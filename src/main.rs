//! Deep-time carbon cycle runner
//!
//! Runs the crust-mantle carbon cycle model and prints a summary table of the
//! headline series through Earth history.
//!
//! # Usage
//!
//! ```bash
//! cargo run --release -- --config configs/default.toml --report-every 100
//! ```

mod cli;
mod report;

use anyhow::Context;
use clap::Parser;
use deepcarb_core::run_model;
use tracing_subscriber::EnvFilter;

use crate::cli::Args;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let params = args.parameters()?;

    if args.print_config {
        let toml = params
            .to_toml_string()
            .context("Failed to serialise parameters")?;
        print!("{toml}");
        return Ok(());
    }

    let output = run_model(params).context("Model run failed")?;
    print!("{}", report::summary_table(&output, args.report_every));

    let negative = output.state.negative_reservoir_steps();
    if !negative.is_empty() {
        tracing::warn!(
            samples = negative.len(),
            "Some reservoirs were negative during the run"
        );
    }
    Ok(())
}
