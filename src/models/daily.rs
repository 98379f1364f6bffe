use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{ClimateVariable, Station};

/// Identity of a row in the extracted table.
///
/// Coordinates are compared bit-for-bit, matching the values copied from the
/// station table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    pub station: String,
    latitude: u64,
    longitude: u64,
    elevation: u64,
    pub date: NaiveDate,
}

impl RecordKey {
    pub fn new(station: &Station, date: NaiveDate) -> Self {
        Self {
            station: station.name.clone(),
            latitude: station.latitude.to_bits(),
            longitude: station.longitude.to_bits(),
            elevation: station.elevation.to_bits(),
            date,
        }
    }

    pub fn latitude(&self) -> f64 {
        f64::from_bits(self.latitude)
    }

    pub fn longitude(&self) -> f64 {
        f64::from_bits(self.longitude)
    }

    pub fn elevation(&self) -> f64 {
        f64::from_bits(self.elevation)
    }
}

/// One station-day of the extracted table.
///
/// Every variable is optional: a variable whose gridded file was missing stays
/// `None` for the whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    #[serde(rename = "City")]
    pub station: String,
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
    #[serde(rename = "Altitude")]
    pub elevation: f64,
    #[serde(rename = "Date")]
    pub date: NaiveDate,

    #[serde(rename = "rss_kJ/m2d", default)]
    pub radiation_kj: Option<f64>,
    #[serde(rename = "rss_MJ/m2/d", default)]
    pub radiation_mj: Option<f64>,
    #[serde(rename = "tasmax", default)]
    pub temp_max: Option<f64>,
    #[serde(rename = "tasmin", default)]
    pub temp_min: Option<f64>,
    #[serde(rename = "pr", default)]
    pub precipitation: Option<f64>,
    #[serde(rename = "sfcWind", default)]
    pub wind_speed: Option<f64>,
    #[serde(rename = "hur_%", default)]
    pub humidity: Option<f64>,

    /// Actual vapor pressure, kPa
    #[serde(rename = "hu_kPa", default)]
    pub vapor_pressure: Option<f64>,
    #[serde(rename = "Wind_km/h", default)]
    pub wind_kmh: Option<f64>,
    #[serde(rename = "CO2ppm", default)]
    pub co2_ppm: Option<f64>,
}

impl DailyRecord {
    pub fn new(station: &Station, date: NaiveDate) -> Self {
        Self {
            station: station.name.clone(),
            latitude: station.latitude,
            longitude: station.longitude,
            elevation: station.elevation,
            date,
            radiation_kj: None,
            radiation_mj: None,
            temp_max: None,
            temp_min: None,
            precipitation: None,
            wind_speed: None,
            humidity: None,
            vapor_pressure: None,
            wind_kmh: None,
            co2_ppm: None,
        }
    }

    pub fn from_key(key: &RecordKey) -> Self {
        let station = Station::new(
            key.station.clone(),
            key.latitude(),
            key.longitude(),
            key.elevation(),
        );
        Self::new(&station, key.date)
    }

    pub fn key(&self) -> RecordKey {
        let station = Station::new(
            self.station.clone(),
            self.latitude,
            self.longitude,
            self.elevation,
        );
        RecordKey::new(&station, self.date)
    }

    pub fn day(&self) -> u32 {
        self.date.day()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Year and day-of-year packed as YYYYDDD
    pub fn year_day_code(&self) -> u32 {
        self.date.year() as u32 * 1000 + self.date.ordinal()
    }

    /// Stores a sampled value in the field owned by `variable`.
    ///
    /// Radiation arrives as kJ and keeps its MJ source value alongside.
    pub fn set_variable(
        &mut self,
        variable: ClimateVariable,
        value: Option<f64>,
        radiation_mj: Option<f64>,
    ) {
        match variable {
            ClimateVariable::Radiation => {
                self.radiation_kj = value;
                self.radiation_mj = radiation_mj;
            }
            ClimateVariable::MaxTemperature => self.temp_max = value,
            ClimateVariable::MinTemperature => self.temp_min = value,
            ClimateVariable::Precipitation => self.precipitation = value,
            ClimateVariable::Wind => self.wind_speed = value,
            ClimateVariable::Humidity => self.humidity = value,
        }
    }

    pub fn mean_temperature(&self) -> Option<f64> {
        match (self.temp_max, self.temp_min) {
            (Some(max), Some(min)) => Some((max + min) / 2.0),
            _ => None,
        }
    }

    pub fn is_same_station(&self, other: &DailyRecord) -> bool {
        self.station == other.station
            && self.latitude.to_bits() == other.latitude.to_bits()
            && self.longitude.to_bits() == other.longitude.to_bits()
            && self.elevation.to_bits() == other.elevation.to_bits()
    }
}
