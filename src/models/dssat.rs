use crate::models::DailyRecord;

/// Header block of a DSSAT `.WTH` weather file
#[derive(Debug, Clone, PartialEq)]
pub struct DssatHeader {
    pub station: String,
    pub insi: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

/// One daily line of a DSSAT `.WTH` weather file.
///
/// Dew point and PAR are not produced and stay blank in the file.
#[derive(Debug, Clone, PartialEq)]
pub struct DssatDay {
    /// YYYYDDD
    pub date: u32,
    /// MJ/m²/day
    pub srad: Option<f64>,
    pub tmax: Option<f64>,
    pub tmin: Option<f64>,
    /// mm
    pub rain: Option<f64>,
    /// km/h
    pub wind: Option<f64>,
    /// %
    pub rhum: Option<f64>,
    /// ppm
    pub co2: Option<f64>,
}

impl From<&DailyRecord> for DssatDay {
    fn from(record: &DailyRecord) -> Self {
        Self {
            date: record.year_day_code(),
            srad: record.radiation_mj,
            tmax: record.temp_max,
            tmin: record.temp_min,
            rain: record.precipitation,
            wind: record.wind_kmh,
            rhum: record.humidity,
            co2: record.co2_ppm,
        }
    }
}
