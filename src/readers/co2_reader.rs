use crate::error::Result;
use crate::models::{Co2Entry, Co2Series};
use std::path::Path;
use tracing::{debug, warn};

pub struct Co2Reader;

impl Co2Reader {
    pub fn new() -> Self {
        Self
    }

    /// Read a CO2-by-year table; a missing file yields `None`.
    pub fn read_optional(&self, path: &Path) -> Result<Option<Co2Series>> {
        if !path.exists() {
            warn!(path = %path.display(), "CO2 table not found, CO2 column disabled");
            return Ok(None);
        }
        self.read_series(path).map(Some)
    }

    pub fn read_series(&self, path: &Path) -> Result<Co2Series> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)?;

        let entries = reader
            .deserialize::<Co2Entry>()
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let series = Co2Series::from_entries(entries);
        debug!(path = %path.display(), years = series.len(), "Read CO2 table");
        Ok(series)
    }
}

impl Default for Co2Reader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_series() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "CO2year,CO2ppm,source")?;
        writeln!(file, "2015,399.95,cmip6")?;
        writeln!(file, "2016,403.12,cmip6")?;

        let series = Co2Reader::new().read_series(file.path())?;
        assert_eq!(series.len(), 2);
        assert_eq!(series.concentration(2016), Some(403.12));
        Ok(())
    }

    #[test]
    fn test_missing_table_is_none() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let series = Co2Reader::new().read_optional(&dir.path().join("atmospheric_hist.co2.csv"))?;
        assert!(series.is_none());
        Ok(())
    }
}
