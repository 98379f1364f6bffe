//! The three batch stages, each fanned out over the configured runs.

use crate::config::RunConfig;
use crate::error::Result;
use crate::models::{DailyRecord, Scenario};
use crate::processors::extractor::{ExtractionSummary, Extractor};
use crate::processors::integrity_checker::{IntegrityChecker, IntegrityReport};
use crate::processors::parallel_processor::ParallelProcessor;
use crate::readers::{ClimateReader, GridOpener, StationReader};
use crate::utils::filename::{extracted_file, run_output_dir};
use crate::utils::progress::ProgressReporter;
use crate::writers::{DssatWriter, SwapWriter};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Station-file output of one (model, scenario) run
#[derive(Debug, Clone)]
pub struct FormatSummary {
    pub model: String,
    pub scenario: Scenario,
    pub input: PathBuf,
    /// Empty when the input table was missing
    pub written: Vec<PathBuf>,
}

/// Extract every configured run
pub fn extract_all(
    config: &RunConfig,
    opener: &dyn GridOpener,
    quiet: bool,
) -> Result<Vec<ExtractionSummary>> {
    let stations = StationReader::new().read_stations(&config.stations_file)?;
    let runs = config.runs();
    info!(stations = stations.len(), runs = runs.len(), "Starting extraction");

    let progress = ProgressReporter::new(runs.len() as u64, "Extracting station series", quiet);
    let extractor = Extractor::new(config, &stations, opener);
    let summaries = ParallelProcessor::new(config.workers).process_runs(
        &runs,
        Some(&progress),
        |model, scenario| extractor.extract(model, scenario),
    )?;

    let written = summaries.iter().filter(|s| s.output.is_some()).count();
    progress.finish_with_message(&format!("Extracted {} of {} runs", written, runs.len()));
    Ok(summaries)
}

/// Write DSSAT `.WTH` files from every extracted table
pub fn generate_dssat(config: &RunConfig, quiet: bool) -> Result<Vec<FormatSummary>> {
    generate_station_files(config, &config.dssat_dir, "DSSAT", quiet, |records, dir, scenario| {
        DssatWriter::new(scenario).write_stations(records, dir)
    })
}

/// Write SWAP `.met` files from every extracted table
pub fn generate_swap(config: &RunConfig, quiet: bool) -> Result<Vec<FormatSummary>> {
    generate_station_files(config, &config.swap_dir, "SWAP", quiet, |records, dir, scenario| {
        SwapWriter::new(scenario).write_stations(records, dir)
    })
}

/// Integrity report of one extracted table
pub fn validate_file(path: &Path) -> Result<IntegrityReport> {
    let records = ClimateReader::new().read_records(path)?;
    Ok(IntegrityChecker::new().check_integrity(&records))
}

fn generate_station_files<F>(
    config: &RunConfig,
    output_dir: &Path,
    format: &str,
    quiet: bool,
    write: F,
) -> Result<Vec<FormatSummary>>
where
    F: Fn(&[DailyRecord], &Path, Scenario) -> Result<Vec<PathBuf>> + Sync + Send,
{
    let station_count = StationReader::new().read_stations(&config.stations_file)?.len();
    let runs = config.runs();
    info!(format, runs = runs.len(), "Generating station files");

    let progress = ProgressReporter::new(
        runs.len() as u64,
        &format!("Writing {} station files", format),
        quiet,
    );
    let summaries = ParallelProcessor::new(config.workers).process_runs(
        &runs,
        Some(&progress),
        |model, scenario| {
            let input = extracted_file(&config.extracted_dir, station_count, model, scenario);
            let mut summary = FormatSummary {
                model: model.to_string(),
                scenario,
                input: input.clone(),
                written: Vec::new(),
            };

            if !input.exists() {
                warn!(path = %input.display(), format, "Extracted table not found, skipping run");
                return Ok(summary);
            }

            let records = ClimateReader::new().read_records(&input)?;
            let dir = run_output_dir(output_dir, model, scenario);
            summary.written = write(&records, &dir, scenario)?;
            info!(model, %scenario, format, files = summary.written.len(), "Wrote station files");
            Ok(summary)
        },
    )?;

    let files: usize = summaries.iter().map(|s| s.written.len()).sum();
    progress.finish_with_message(&format!("Wrote {} {} files", files, format));
    Ok(summaries)
}
