use anyhow::Context;
use clap::Parser;
use deepcarb_core::CarbonCycleParameters;
use std::fs;
use std::path::{Path, PathBuf};

/// Deep-time carbon cycle box model
#[derive(Parser, Debug)]
#[command(name = "deepcarb")]
#[command(about = "Run the crust-mantle carbon cycle model over Earth history")]
pub struct Args {
    /// TOML parameter file. Values it omits keep their defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the effective parameters as TOML and exit
    #[arg(long)]
    pub print_config: bool,

    /// Spacing of summary rows in Myr
    #[arg(long, default_value_t = 250, value_parser = clap::value_parser!(u64).range(1..))]
    pub report_every: u64,

    /// Log run progress (overridden by RUST_LOG)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Parameters from the config file, or the defaults when none is given
    pub fn parameters(&self) -> anyhow::Result<CarbonCycleParameters> {
        match &self.config {
            Some(path) => load_parameters(path),
            None => Ok(CarbonCycleParameters::default()),
        }
    }
}

pub fn load_parameters(path: &Path) -> anyhow::Result<CarbonCycleParameters> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read parameter file {}", path.display()))?;
    CarbonCycleParameters::from_toml_str(&content)
        .with_context(|| format!("Invalid parameter file {}", path.display()))
}
