use crate::models::{ClimateVariable, DailyRecord};
use crate::utils::constants::{MS_TO_KMH, TETENS_A, TETENS_B, TETENS_C};

/// Saturation vapor pressure (kPa) at `t_mean` °C, Tetens form
pub fn saturation_vapor_pressure(t_mean: f64) -> f64 {
    TETENS_A * ((TETENS_B * t_mean) / (t_mean + TETENS_C)).exp()
}

/// Actual vapor pressure (kPa) from relative humidity (%) and mean temperature
pub fn actual_vapor_pressure(humidity_pct: f64, t_mean: f64) -> f64 {
    (humidity_pct / 100.0) * saturation_vapor_pressure(t_mean)
}

/// Computes the fields derived from the loaded variables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDeriver {
    vapor_pressure: bool,
    wind_kmh: bool,
}

impl FieldDeriver {
    /// Vapor pressure needs both temperatures and humidity; km/h wind needs wind.
    pub fn for_variables(loaded: &[ClimateVariable]) -> Self {
        let has = |v: ClimateVariable| loaded.contains(&v);
        Self {
            vapor_pressure: has(ClimateVariable::MaxTemperature)
                && has(ClimateVariable::MinTemperature)
                && has(ClimateVariable::Humidity),
            wind_kmh: has(ClimateVariable::Wind),
        }
    }

    pub fn derives_vapor_pressure(&self) -> bool {
        self.vapor_pressure
    }

    pub fn derives_wind_kmh(&self) -> bool {
        self.wind_kmh
    }

    pub fn apply(&self, table: &mut [DailyRecord]) {
        for record in table.iter_mut() {
            if self.vapor_pressure {
                record.vapor_pressure = match (record.humidity, record.mean_temperature()) {
                    (Some(humidity), Some(t_mean)) => {
                        Some(actual_vapor_pressure(humidity, t_mean))
                    }
                    _ => None,
                };
            }
            if self.wind_kmh {
                record.wind_kmh = record.wind_speed.map(|ms| ms * MS_TO_KMH);
            }
        }
    }
}
