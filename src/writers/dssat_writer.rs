use crate::error::Result;
use crate::models::{DailyRecord, DssatDay, DssatHeader, Scenario};
use crate::utils::constants::{DSSAT_INSI_PREFIX, DSSAT_MISSING};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const COLUMN_HEADER: &str = "@ INSI       LAT     LONG  ELEV   TAV   AMP REFHT WNDHT";
const DAILY_HEADER: &str = "@  DATE  SRAD  TMAX  TMIN  RAIN  DEWP  WIND   PAR  RHUM    CO2";
/// TAV, AMP, REFHT and WNDHT are not computed
const HEADER_CONSTANTS: &str = " 0.0   0.0   2.0  10.0";

/// Four-letter institute-and-site code, e.g. `BRSPA` for "Sao Paulo".
///
/// Two or more words take one character of the first and two of the second;
/// a single word takes its first three.
pub fn station_code(name: &str) -> String {
    let words: Vec<&str> = name.split_whitespace().collect();
    let site: String = match words.as_slice() {
        [] => String::new(),
        [single] => single.chars().take(3).collect(),
        [first, second, ..] => first.chars().take(1).chain(second.chars().take(2)).collect(),
    };
    format!("{}{}", DSSAT_INSI_PREFIX, site).to_uppercase()
}

/// `<INSI><suffix><year tag>.WTH`
pub fn file_name(insi: &str, scenario: Scenario) -> String {
    format!("{}{}{}.WTH", insi, scenario.file_suffix(), scenario.year_tag())
}

pub struct DssatWriter {
    scenario: Scenario,
}

impl DssatWriter {
    pub fn new(scenario: Scenario) -> Self {
        Self { scenario }
    }

    /// Renders one station's weather file
    pub fn render(&self, header: &DssatHeader, days: &[DssatDay]) -> String {
        let mut lines = Vec::with_capacity(days.len() + 4);
        lines.push(format!(
            "$WEATHER DATA : {}_{}",
            header.station, self.scenario
        ));
        lines.push(COLUMN_HEADER.to_string());
        lines.push(format!(
            "  {}  {:<7.3}  {:<7.3}  {:<5.0}{}",
            header.insi, header.latitude, header.longitude, header.elevation, HEADER_CONSTANTS
        ));
        lines.push(DAILY_HEADER.to_string());
        lines.extend(days.iter().map(render_day));
        lines.join("\n")
    }

    /// Writes one `.WTH` file per station into `dir`, stations in name order.
    ///
    /// Returns the written paths.
    pub fn write_stations(&self, records: &[DailyRecord], dir: &Path) -> Result<Vec<PathBuf>> {
        let mut stations: BTreeMap<&str, Vec<&DailyRecord>> = BTreeMap::new();
        for record in records {
            stations.entry(record.station.as_str()).or_default().push(record);
        }

        fs::create_dir_all(dir)?;
        let mut written = Vec::with_capacity(stations.len());
        for (station, rows) in stations {
            let first = rows[0];
            let header = DssatHeader {
                station: station.to_string(),
                insi: station_code(station),
                latitude: first.latitude,
                longitude: first.longitude,
                elevation: first.elevation,
            };
            let days: Vec<DssatDay> = rows.iter().map(|r| DssatDay::from(*r)).collect();

            let path = dir.join(file_name(&header.insi, self.scenario));
            fs::write(&path, self.render(&header, &days))?;
            debug!(station, path = %path.display(), days = days.len(), "Wrote DSSAT file");
            written.push(path);
        }
        Ok(written)
    }
}

fn render_day(day: &DssatDay) -> String {
    format!(
        "{:<6}  {:>4.1}  {:>4.1}  {:>4.1}  {:>4.1} {:>6} {:>4.1} {:>5}  {:>4.1}  {:>4.1}",
        day.date,
        or_missing(day.srad),
        or_missing(day.tmax),
        or_missing(day.tmin),
        or_missing(day.rain),
        "",
        or_missing(day.wind),
        "",
        or_missing(day.rhum),
        or_missing(day.co2),
    )
}

fn or_missing(value: Option<f64>) -> f64 {
    value.unwrap_or(DSSAT_MISSING)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Station;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_station_code() {
        assert_eq!(station_code("Sao Paulo"), "BRSPA");
        assert_eq!(station_code("Piracicaba"), "BRPIR");
        assert_eq!(station_code("rio de janeiro"), "BRRDE");
        assert_eq!(station_code("Ji"), "BRJI");
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("BRSPA", Scenario::Ssp245), "BRSPA4515.WTH");
        assert_eq!(file_name("BRSPA", Scenario::Hist), "BRSPAst80.WTH");
    }

    #[test]
    fn test_render() {
        let header = DssatHeader {
            station: "Sao Paulo".to_string(),
            insi: "BRSPA".to_string(),
            latitude: -23.55,
            longitude: -46.633,
            elevation: 760.0,
        };
        let days = vec![
            DssatDay {
                date: 2015001,
                srad: Some(18.3),
                tmax: Some(29.5),
                tmin: Some(19.0),
                rain: Some(0.0),
                wind: Some(7.2),
                rhum: Some(80.0),
                co2: Some(400.0),
            },
            DssatDay {
                date: 2015002,
                srad: None,
                tmax: Some(30.0),
                tmin: Some(20.0),
                rain: Some(12.3),
                wind: None,
                rhum: None,
                co2: None,
            },
        ];

        let text = DssatWriter::new(Scenario::Ssp245).render(&header, &days);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "$WEATHER DATA : Sao Paulo_ssp245");
        assert_eq!(lines[1], COLUMN_HEADER);
        assert_eq!(lines[2], "  BRSPA  -23.550  -46.633  760   0.0   0.0   2.0  10.0");
        assert_eq!(lines[3], DAILY_HEADER);
        assert_eq!(
            lines[4],
            "2015001  18.3  29.5  19.0   0.0         7.2        80.0  400.0"
        );
        assert_eq!(
            lines[5],
            "2015002  -99.0  30.0  20.0  12.3        -99.0        -99.0  -99.0"
        );
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn test_write_stations_sorted_by_name() -> Result<()> {
        let dir = TempDir::new()?;
        let date = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
        let records = vec![
            DailyRecord::new(&Station::new("Sao Paulo".to_string(), -23.55, -46.633, 760.0), date),
            DailyRecord::new(&Station::new("Piracicaba".to_string(), -22.7, -47.63, 546.0), date),
        ];

        let written = DssatWriter::new(Scenario::Ssp585).write_stations(&records, dir.path())?;

        let names: Vec<_> = written
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
            .collect();
        assert_eq!(names, vec!["BRPIR8515.WTH", "BRSPA8515.WTH"]);
        Ok(())
    }
}
