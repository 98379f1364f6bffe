use serde::{Deserialize, Serialize};

use crate::models::DailyRecord;
use crate::utils::constants::{ETREF_NOT_COMPUTED, WET_DAY_THRESHOLD_MM};

/// One row of a SWAP `.met` meteorological file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetRecord {
    pub station: String,
    #[serde(rename = "DD")]
    pub day: u32,
    #[serde(rename = "MM")]
    pub month: u32,
    #[serde(rename = "YYYY")]
    pub year: i32,
    /// kJ/m²/day
    #[serde(rename = "Rad")]
    pub radiation: Option<f64>,
    #[serde(rename = "Tmin")]
    pub temp_min: Option<f64>,
    #[serde(rename = "Tmax")]
    pub temp_max: Option<f64>,
    /// Actual vapor pressure, kPa
    #[serde(rename = "Hum")]
    pub humidity: Option<f64>,
    /// m/s
    #[serde(rename = "Wind")]
    pub wind: Option<f64>,
    /// mm
    #[serde(rename = "Rain")]
    pub rain: Option<f64>,
    #[serde(rename = "ETref")]
    pub et_ref: f64,
    #[serde(rename = "Wet")]
    pub wet: f64,
}

impl MetRecord {
    /// Projects an extracted record onto the SWAP layout, rounding every
    /// measurement to the precision SWAP reads.
    pub fn from_daily(record: &DailyRecord, station_label: &str) -> Self {
        let rain = record.precipitation.map(|v| round_to(v, 1));

        Self {
            station: station_label.to_string(),
            day: record.day(),
            month: record.month(),
            year: record.year(),
            radiation: record.radiation_kj.map(|v| round_to(v, 1)),
            temp_min: record.temp_min.map(|v| round_to(v, 1)),
            temp_max: record.temp_max.map(|v| round_to(v, 1)),
            humidity: record.vapor_pressure.map(|v| round_to(v, 3)),
            wind: record.wind_speed.map(|v| round_to(v, 1)),
            rain,
            et_ref: ETREF_NOT_COMPUTED,
            wet: wet_flag(rain),
        }
    }
}

/// 1.0 on days with strictly more than 5 mm of rain
pub fn wet_flag(rain: Option<f64>) -> f64 {
    match rain {
        Some(mm) if mm > WET_DAY_THRESHOLD_MM => 1.0,
        _ => 0.0,
    }
}

/// Rounds half to even on the scaled value.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}
