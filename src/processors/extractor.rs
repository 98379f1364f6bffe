use crate::config::RunConfig;
use crate::error::Result;
use crate::models::{ClimateVariable, Co2Series, DailyRecord, Scenario, Station};
use crate::processors::corrections::{CorrectionReport, QualityCorrector};
use crate::processors::data_merger::{DataMerger, VariableColumn};
use crate::processors::derived::FieldDeriver;
use crate::processors::integrity_checker::{IntegrityChecker, IntegrityReport};
use crate::readers::{Co2Reader, GridOpener, GridSource};
use crate::utils::filename::{co2_file, extracted_file, gridded_file};
use crate::writers::ExtractedCsvWriter;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Merged table of one (model, scenario) run before it is written
#[derive(Debug, Clone)]
pub struct ExtractedTable {
    pub records: Vec<DailyRecord>,
    /// Variables that loaded, in merge order
    pub loaded: Vec<ClimateVariable>,
    pub skipped: Vec<ClimateVariable>,
    pub co2: Option<Co2Series>,
}

/// Outcome of one extraction run
#[derive(Debug, Clone)]
pub struct ExtractionSummary {
    pub model: String,
    pub scenario: Scenario,
    /// `None` when no gridded variable was found
    pub output: Option<PathBuf>,
    pub rows: usize,
    pub loaded: Vec<ClimateVariable>,
    pub skipped: Vec<ClimateVariable>,
    pub corrections: CorrectionReport,
    pub integrity: Option<IntegrityReport>,
}

/// Samples every gridded variable of a run at the stations and writes the
/// merged, corrected table.
pub struct Extractor<'a> {
    config: &'a RunConfig,
    stations: &'a [Station],
    opener: &'a dyn GridOpener,
    merger: DataMerger,
}

impl<'a> Extractor<'a> {
    pub fn new(config: &'a RunConfig, stations: &'a [Station], opener: &'a dyn GridOpener) -> Self {
        Self {
            config,
            stations,
            opener,
            merger: DataMerger::new(),
        }
    }

    pub fn extract(&self, model: &str, scenario: Scenario) -> Result<ExtractionSummary> {
        info!(model, %scenario, stations = self.stations.len(), "Extracting");

        let mut table = self.build_table(model, scenario)?;
        let mut summary = ExtractionSummary {
            model: model.to_string(),
            scenario,
            output: None,
            rows: 0,
            loaded: table.loaded.clone(),
            skipped: table.skipped.clone(),
            corrections: CorrectionReport::default(),
            integrity: None,
        };

        if table.loaded.is_empty() {
            warn!(model, %scenario, "No gridded variable found, no table written");
            return Ok(summary);
        }

        summary.corrections = QualityCorrector::new().apply(&mut table.records);
        debug!(model, %scenario, corrections = ?summary.corrections, "Applied corrections");

        let deriver = FieldDeriver::for_variables(&table.loaded);
        deriver.apply(&mut table.records);

        let checker = IntegrityChecker::new();
        let integrity = checker.check_integrity(&table.records);
        if integrity.is_clean() {
            debug!("{}", checker.generate_summary(&integrity));
        } else {
            warn!(
                model,
                %scenario,
                duplicates = integrity.duplicate_keys,
                gaps = integrity.date_gaps.len(),
                violations = integrity.violations.len(),
                "Extracted table failed integrity checks"
            );
        }

        let writer = ExtractedCsvWriter::new(
            &table.loaded,
            deriver.derives_vapor_pressure(),
            deriver.derives_wind_kmh(),
            table.co2.is_some(),
        );
        let path = extracted_file(&self.config.extracted_dir, self.stations.len(), model, scenario);
        writer.write_records(&table.records, &path)?;
        info!(path = %path.display(), rows = table.records.len(), "Wrote extracted table");

        summary.rows = table.records.len();
        summary.output = Some(path);
        summary.integrity = Some(integrity);
        Ok(summary)
    }

    /// Loads and merges every configured variable, then joins CO2.
    pub fn build_table(&self, model: &str, scenario: Scenario) -> Result<ExtractedTable> {
        let mut table = ExtractedTable {
            records: Vec::new(),
            loaded: Vec::new(),
            skipped: Vec::new(),
            co2: None,
        };

        for &variable in &self.config.variables {
            let path = gridded_file(&self.config.gridded_dir, model, scenario, variable);
            let Some(grid) = self.opener.open(&path, variable)? else {
                warn!(path = %path.display(), %variable, "Gridded file not found, skipping variable");
                table.skipped.push(variable);
                continue;
            };

            let column = self.sample_stations(grid.as_ref(), scenario)?;
            let stats = self.merger.merge_variable(&mut table.records, column);
            debug!(
                %variable,
                matched = stats.matched,
                unmatched = stats.unmatched,
                duplicates = stats.duplicates_dropped,
                "Merged variable"
            );
            table.loaded.push(variable);
        }

        if table.loaded.is_empty() {
            return Ok(table);
        }

        table.co2 = Co2Reader::new().read_optional(&co2_file(&self.config.co2_dir, scenario))?;
        if let Some(co2) = &table.co2 {
            let unmatched = self.merger.join_co2(&mut table.records, co2);
            if unmatched > 0 {
                debug!(unmatched, "Rows without a CO2 concentration for their year");
            }
        }

        Ok(table)
    }

    fn sample_stations(&self, grid: &dyn GridSource, scenario: Scenario) -> Result<VariableColumn> {
        let variable = grid.variable();
        let mut column = VariableColumn::new(variable);

        for (index, station) in self.stations.iter().enumerate() {
            let series = grid.sample_point(station.latitude, station.longitude, scenario.start_date())?;

            if index == 0 && !series.calendar.has_leap_days() {
                warn!(
                    %variable,
                    calendar = ?series.calendar,
                    "Calendar has no 29 February; leap days will be missing from the table"
                );
            }
            debug!(
                station = %station.name,
                grid_latitude = series.grid_latitude,
                grid_longitude = series.grid_longitude,
                days = series.dates.len(),
                "Sampled station"
            );

            column.push_series(station, series)?;
        }

        Ok(column)
    }
}
