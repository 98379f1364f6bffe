use crate::error::Result;
use crate::models::DailyRecord;
use std::path::Path;
use tracing::debug;

/// Reads the per-(model, scenario) CSV written by the extractor.
///
/// Columns of variables that were not extracted simply deserialize as `None`.
pub struct ClimateReader;

impl ClimateReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read_records(&self, path: &Path) -> Result<Vec<DailyRecord>> {
        let mut reader = csv::Reader::from_path(path)?;
        let records = reader
            .deserialize::<DailyRecord>()
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!(path = %path.display(), rows = records.len(), "Read extracted table");
        Ok(records)
    }
}

impl Default for ClimateReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_partial_columns() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(
            file,
            "City,Latitude,Longitude,Altitude,DD,MM,YYYY,Date,tasmax,tasmin,pr,YYYYDDD"
        )?;
        writeln!(
            file,
            "Sao Paulo,-23.55,-46.633,760.0,1,1,2015,2015-01-01,29.5,19.25,,2015001"
        )?;

        let records = ClimateReader::new().read_records(file.path())?;

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.station, "Sao Paulo");
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2015, 1, 1).unwrap());
        assert_eq!(record.temp_max, Some(29.5));
        assert_eq!(record.precipitation, None);
        assert_eq!(record.radiation_mj, None);
        assert_eq!(record.co2_ppm, None);
        Ok(())
    }
}
