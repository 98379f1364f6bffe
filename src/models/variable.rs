use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ProcessingError;

/// Gridded variables published per model and scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClimateVariable {
    /// Surface solar radiation, MJ/m²/day
    #[serde(rename = "rss")]
    Radiation,
    /// Daily maximum temperature, °C
    #[serde(rename = "tasmax")]
    MaxTemperature,
    /// Daily minimum temperature, °C
    #[serde(rename = "tasmin")]
    MinTemperature,
    /// Precipitation, mm/day
    #[serde(rename = "pr")]
    Precipitation,
    /// 10 m wind speed, m/s
    #[serde(rename = "sfcWind")]
    Wind,
    /// Relative humidity, %
    #[serde(rename = "hur")]
    Humidity,
}

impl ClimateVariable {
    pub const ALL: [ClimateVariable; 6] = [
        ClimateVariable::Radiation,
        ClimateVariable::MaxTemperature,
        ClimateVariable::MinTemperature,
        ClimateVariable::Precipitation,
        ClimateVariable::Wind,
        ClimateVariable::Humidity,
    ];

    /// Variable name inside the NetCDF file and in the file name
    pub fn as_str(&self) -> &'static str {
        match self {
            ClimateVariable::Radiation => "rss",
            ClimateVariable::MaxTemperature => "tasmax",
            ClimateVariable::MinTemperature => "tasmin",
            ClimateVariable::Precipitation => "pr",
            ClimateVariable::Wind => "sfcWind",
            ClimateVariable::Humidity => "hur",
        }
    }
}

impl fmt::Display for ClimateVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClimateVariable {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClimateVariable::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ProcessingError::Config(format!("Unknown variable: {}", s)))
    }
}
