use crate::cli::args::{Cli, Commands, RunFilters};
use crate::config::RunConfig;
use crate::error::{ProcessingError, Result};
use crate::processors::{
    extract_all, generate_dssat, generate_swap, validate_file, ExtractionSummary, FormatSummary,
    IntegrityChecker,
};
use crate::readers::default_opener;
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;
    let quiet = cli.quiet;
    let config_path = cli.config;

    match cli.command {
        Commands::Extract(filters) => {
            let config = load_config(config_path.as_deref(), &filters)?;
            let opener = default_opener();
            let summaries = extract_all(&config, opener.as_ref(), quiet)?;
            print_extraction(&summaries, quiet);
        }

        Commands::Dssat(filters) => {
            let config = load_config(config_path.as_deref(), &filters)?;
            let summaries = generate_dssat(&config, quiet)?;
            print_format("DSSAT", &summaries, quiet);
        }

        Commands::Swap(filters) => {
            let config = load_config(config_path.as_deref(), &filters)?;
            let summaries = generate_swap(&config, quiet)?;
            print_format("SWAP", &summaries, quiet);
        }

        Commands::Run(filters) => {
            let config = load_config(config_path.as_deref(), &filters)?;
            let opener = default_opener();

            let extracted = extract_all(&config, opener.as_ref(), quiet)?;
            print_extraction(&extracted, quiet);

            let dssat = generate_dssat(&config, quiet)?;
            print_format("DSSAT", &dssat, quiet);

            let swap = generate_swap(&config, quiet)?;
            print_format("SWAP", &swap, quiet);
        }

        Commands::Validate { input, json } => {
            info!(path = %input.display(), "Validating extracted table");
            let report = validate_file(&input)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", IntegrityChecker::new().generate_summary(&report));
                if report.is_clean() {
                    println!("All records passed validation checks");
                } else {
                    println!(
                        "Found {} duplicate keys, {} date gaps and {} bound violations",
                        report.duplicate_keys,
                        report.date_gaps.len(),
                        report.violations.len()
                    );
                }
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>, filters: &RunFilters) -> Result<RunConfig> {
    let config = RunConfig::load(path)?
        .with_filters(&filters.models, &filters.scenarios)?
        .with_workers(filters.workers);
    info!(
        models = config.models.len(),
        scenarios = config.scenarios.len(),
        workers = config.workers,
        "Loaded configuration"
    );
    Ok(config)
}

/// Installs the global fmt subscriber; `--log-file` redirects it to a file.
fn init_logging(verbose: bool, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose {
        Level::DEBUG
    } else if quiet {
        Level::WARN
    } else {
        Level::INFO
    };

    let installed = match log_file {
        Some(path) => {
            let file = File::create(path)?;
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .finish();
            tracing::subscriber::set_global_default(subscriber)
        }
        None => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_target(false)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)
        }
    };

    installed.map_err(|e| ProcessingError::Config(format!("Failed to initialise logging: {}", e)))
}

fn print_extraction(summaries: &[ExtractionSummary], quiet: bool) {
    if quiet {
        return;
    }

    println!("\nExtraction:");
    for summary in summaries {
        match &summary.output {
            Some(path) => {
                println!(
                    "  {} {}: {} rows -> {}",
                    summary.model,
                    summary.scenario,
                    summary.rows,
                    path.display()
                );
                if !summary.skipped.is_empty() {
                    let skipped: Vec<_> = summary.skipped.iter().map(|v| v.as_str()).collect();
                    println!("    skipped variables: {}", skipped.join(", "));
                }
                if summary.corrections.total() > 0 {
                    println!("    corrected values: {}", summary.corrections.total());
                }
            }
            None => println!(
                "  {} {}: no gridded files found",
                summary.model, summary.scenario
            ),
        }
    }
}

fn print_format(format: &str, summaries: &[FormatSummary], quiet: bool) {
    if quiet {
        return;
    }

    println!("\n{} files:", format);
    for summary in summaries {
        if summary.written.is_empty() {
            println!(
                "  {} {}: skipped, {} not found",
                summary.model,
                summary.scenario,
                summary.input.display()
            );
        } else {
            println!(
                "  {} {}: {} files",
                summary.model,
                summary.scenario,
                summary.written.len()
            );
        }
    }
}
