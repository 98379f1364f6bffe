use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::models::Scenario;

#[derive(Parser)]
#[command(name = "climbra-stations")]
#[command(about = "Extract CLIMBra climate projections at weather stations and write DSSAT and SWAP files")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Configuration file (TOML, YAML or JSON)")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Hide progress bars and summaries")]
    pub quiet: bool,
}

/// Selection of runs shared by the batch stages
#[derive(Args, Debug, Clone, Default)]
pub struct RunFilters {
    #[arg(short, long = "model", help = "Only process this model (repeatable)")]
    pub models: Vec<String>,

    #[arg(
        short,
        long = "scenario",
        value_parser = parse_scenario,
        help = "Only process this scenario: ssp245, ssp585 or hist (repeatable)"
    )]
    pub scenarios: Vec<Scenario>,

    #[arg(short, long, help = "Worker threads [default: number of CPUs]")]
    pub workers: Option<usize>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sample the gridded files at every station and write one CSV per model and scenario
    Extract(RunFilters),

    /// Write DSSAT .WTH files from the extracted CSVs
    Dssat(RunFilters),

    /// Write SWAP .met files from the extracted CSVs
    Swap(RunFilters),

    /// Extract, then write DSSAT and SWAP files
    Run(RunFilters),

    /// Check the integrity of one extracted CSV
    Validate {
        #[arg(short, long, help = "Extracted CSV file")]
        input: PathBuf,

        #[arg(long, help = "Print the report as JSON")]
        json: bool,
    },
}

fn parse_scenario(value: &str) -> Result<Scenario, String> {
    value.parse().map_err(|e: crate::error::ProcessingError| e.to_string())
}
