use crate::error::{ProcessingError, Result};
use crate::models::Station;
use encoding_rs::{UTF_8, WINDOWS_1252};
use serde::Deserialize;
use std::borrow::Cow;
use std::path::Path;
use tracing::debug;
use validator::Validate;

#[derive(Debug, Deserialize)]
struct StationRow {
    #[serde(rename = "STATIONNAME")]
    name: String,
    #[serde(rename = "LATITUDE")]
    latitude: f64,
    #[serde(rename = "LONGITUDE")]
    longitude: f64,
    #[serde(rename = "ELEVATION_METER")]
    elevation: f64,
}

pub struct StationReader {
    delimiter: u8,
}

impl StationReader {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Read the station table, keeping file order
    pub fn read_stations(&self, path: &Path) -> Result<Vec<Station>> {
        let bytes = std::fs::read(path)?;
        let text = decode_table(&bytes);
        self.parse_stations(&text)
    }

    fn parse_stations(&self, text: &str) -> Result<Vec<Station>> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let mut stations = Vec::new();
        for (row_index, row) in reader.deserialize::<StationRow>().enumerate() {
            let row = row?;
            let station = Station::new(row.name, row.latitude, row.longitude, row.elevation);
            station.validate().map_err(|e| {
                ProcessingError::InvalidFormat(format!(
                    "Station on row {} is invalid: {}",
                    row_index + 2,
                    e
                ))
            })?;
            stations.push(station);
        }

        if stations.is_empty() {
            return Err(ProcessingError::MissingData(
                "station table has no rows".to_string(),
            ));
        }

        debug!(count = stations.len(), "Read station table");
        Ok(stations)
    }
}

impl Default for StationReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Station tables edited on Windows are often saved as Windows-1252.
fn decode_table(bytes: &[u8]) -> Cow<'_, str> {
    let (text, _, had_errors) = UTF_8.decode(bytes);
    if had_errors {
        let (text, _, _) = WINDOWS_1252.decode(bytes);
        text
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_stations_file() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "ID,STATIONNAME,LATITUDE,LONGITUDE,ELEVATION_METER")?;
        writeln!(temp_file, "1,Sao Paulo,-23.55,-46.633,760")?;
        writeln!(temp_file, "2, Piracicaba ,-22.7,-47.63,546")?;

        let reader = StationReader::new();
        let stations = reader.read_stations(temp_file.path())?;

        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].name, "Sao Paulo");
        assert_eq!(stations[0].latitude, -23.55);
        assert_eq!(stations[0].elevation, 760.0);
        assert_eq!(stations[1].name, "Piracicaba");

        Ok(())
    }

    #[test]
    fn test_windows_1252_names() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        temp_file.write_all(b"STATIONNAME,LATITUDE,LONGITUDE,ELEVATION_METER\n")?;
        // "São Carlos" with ã encoded as 0xE3
        temp_file.write_all(b"S\xe3o Carlos,-22.01,-47.89,856\n")?;

        let stations = StationReader::new().read_stations(temp_file.path())?;
        assert_eq!(stations[0].name, "São Carlos");

        Ok(())
    }

    #[test]
    fn test_invalid_station_is_rejected() {
        let reader = StationReader::new();
        let text = "STATIONNAME,LATITUDE,LONGITUDE,ELEVATION_METER\nBad,-123.0,-46.6,10\n";
        assert!(reader.parse_stations(text).is_err());
    }

    #[test]
    fn test_semicolon_delimited_table() -> Result<()> {
        let reader = StationReader::with_delimiter(b';');
        let text = "STATIONNAME;LATITUDE;LONGITUDE;ELEVATION_METER\nPiracicaba;-22.7;-47.63;546\n";
        let stations = reader.parse_stations(text)?;
        assert_eq!(stations[0].longitude, -47.63);
        Ok(())
    }

    #[test]
    fn test_empty_table_is_rejected() {
        let reader = StationReader::new();
        let text = "STATIONNAME,LATITUDE,LONGITUDE,ELEVATION_METER\n";
        assert!(reader.parse_stations(text).is_err());
    }
}
