use crate::models::DailyRecord;
use crate::processors::interpolation::interpolate_linear;
use crate::utils::constants::{
    CLAMPED_HUMIDITY, MAX_HUMIDITY, MIN_RADIATION_KJ, NEGATIVE_WIND_REPLACEMENT,
};

/// Number of values changed by each correction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorrectionReport {
    pub humidity_clamped: usize,
    pub wind_replaced: usize,
    pub precipitation_zeroed: usize,
    pub radiation_raised: usize,
    pub inverted_temperatures: usize,
}

impl CorrectionReport {
    pub fn total(&self) -> usize {
        self.humidity_clamped
            + self.wind_replaced
            + self.precipitation_zeroed
            + self.radiation_raised
            + self.inverted_temperatures
    }
}

/// Row-wise data-quality corrections for the extracted table.
///
/// The table must hold each station's rows contiguously and in date order.
pub struct QualityCorrector;

impl QualityCorrector {
    pub fn new() -> Self {
        Self
    }

    pub fn apply(&self, table: &mut [DailyRecord]) -> CorrectionReport {
        let mut report = CorrectionReport::default();

        for record in table.iter_mut() {
            if replace_if(&mut record.humidity, |v| v > MAX_HUMIDITY, CLAMPED_HUMIDITY) {
                report.humidity_clamped += 1;
            }
            if replace_if(&mut record.wind_speed, |v| v < 0.0, NEGATIVE_WIND_REPLACEMENT) {
                report.wind_replaced += 1;
            }
            if replace_if(&mut record.precipitation, |v| v < 0.0, 0.0) {
                report.precipitation_zeroed += 1;
            }
            if replace_if(&mut record.radiation_kj, |v| v < MIN_RADIATION_KJ, MIN_RADIATION_KJ) {
                report.radiation_raised += 1;
            }
        }

        report.inverted_temperatures = self.fix_inverted_temperatures(table);
        report
    }

    /// Clears both temperatures wherever the minimum exceeds the maximum, then
    /// refills both series along time for every station.
    pub fn fix_inverted_temperatures(&self, table: &mut [DailyRecord]) -> usize {
        let mut inverted = 0;
        for record in table.iter_mut() {
            if let (Some(min), Some(max)) = (record.temp_min, record.temp_max) {
                if min > max {
                    record.temp_min = None;
                    record.temp_max = None;
                    inverted += 1;
                }
            }
        }

        for station_rows in table.chunk_by_mut(|a, b| a.is_same_station(b)) {
            let mut mins: Vec<Option<f64>> = station_rows.iter().map(|r| r.temp_min).collect();
            let mut maxs: Vec<Option<f64>> = station_rows.iter().map(|r| r.temp_max).collect();
            interpolate_linear(&mut mins);
            interpolate_linear(&mut maxs);

            for (record, (min, max)) in station_rows.iter_mut().zip(mins.into_iter().zip(maxs)) {
                record.temp_min = min;
                record.temp_max = max;
            }
        }

        inverted
    }
}

impl Default for QualityCorrector {
    fn default() -> Self {
        Self::new()
    }
}

fn replace_if(slot: &mut Option<f64>, predicate: impl Fn(f64) -> bool, replacement: f64) -> bool {
    match slot {
        Some(value) if predicate(*value) => {
            *value = replacement;
            true
        }
        _ => false,
    }
}
