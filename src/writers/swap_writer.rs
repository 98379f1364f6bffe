use crate::error::Result;
use crate::models::{DailyRecord, MetRecord, Scenario};
use crate::utils::constants::SWAP_STATION_CHARS;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Station label without quotes: name without spaces, cut to six characters,
/// followed by the scenario (`SaoPaussp245`).
pub fn station_label(name: &str, scenario: Scenario) -> String {
    let compact: String = name
        .chars()
        .filter(|c| *c != ' ')
        .take(SWAP_STATION_CHARS)
        .collect();
    format!("{}{}", compact, scenario)
}

pub struct SwapWriter {
    scenario: Scenario,
}

impl SwapWriter {
    pub fn new(scenario: Scenario) -> Self {
        Self { scenario }
    }

    /// Converts one station's rows to `.met` records
    pub fn met_records(&self, label: &str, rows: &[&DailyRecord]) -> Vec<MetRecord> {
        let quoted = format!("'{}'", label);
        rows.iter().map(|r| MetRecord::from_daily(r, &quoted)).collect()
    }

    /// Write met records to a comma-delimited file with a header row
    pub fn write_met(&self, records: &[MetRecord], path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Writes one `.met` file per station into `dir`, stations in order of
    /// first appearance.
    pub fn write_stations(&self, records: &[DailyRecord], dir: &Path) -> Result<Vec<PathBuf>> {
        let mut stations: Vec<(&str, Vec<&DailyRecord>)> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();
        for record in records {
            let name = record.station.as_str();
            match positions.get(name) {
                Some(&index) => stations[index].1.push(record),
                None => {
                    positions.insert(name, stations.len());
                    stations.push((name, vec![record]));
                }
            }
        }

        fs::create_dir_all(dir)?;
        let mut written = Vec::with_capacity(stations.len());
        for (station, rows) in stations {
            let label = station_label(station, self.scenario);
            let met = self.met_records(&label, &rows);

            let path = dir.join(format!("{}.met", label));
            self.write_met(&met, &path)?;
            debug!(station, path = %path.display(), days = met.len(), "Wrote SWAP file");
            written.push(path);
        }
        Ok(written)
    }
}
