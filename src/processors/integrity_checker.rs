use crate::models::DailyRecord;
use crate::utils::calendar::is_leap_day_gap;
use crate::utils::constants::{MAX_HUMIDITY, MIN_RADIATION_KJ};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

#[derive(Debug, Clone, Serialize)]
pub struct IntegrityReport {
    pub total_records: usize,
    pub stations: usize,
    pub duplicate_keys: usize,
    pub date_gaps: Vec<DateGap>,
    pub leap_day_gaps: usize,
    pub violations: Vec<BoundViolation>,
    /// Missing values per output column, for columns with at least one value
    pub missing_values: BTreeMap<String, usize>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.duplicate_keys == 0 && self.date_gaps.is_empty() && self.violations.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DateGap {
    pub station: String,
    pub after: NaiveDate,
    pub before: NaiveDate,
    pub missing_days: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BoundViolation {
    pub station: String,
    pub date: NaiveDate,
    pub violation_type: ViolationType,
    pub details: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ViolationType {
    HumidityAboveMaximum,
    NegativeWind,
    NegativePrecipitation,
    RadiationBelowMinimum,
    MinAboveMax,
}

pub struct IntegrityChecker;

impl IntegrityChecker {
    pub fn new() -> Self {
        Self
    }

    /// Check integrity of an extracted table
    pub fn check_integrity(&self, records: &[DailyRecord]) -> IntegrityReport {
        let mut report = IntegrityReport {
            total_records: records.len(),
            stations: 0,
            duplicate_keys: 0,
            date_gaps: Vec::new(),
            leap_day_gaps: 0,
            violations: Vec::new(),
            missing_values: BTreeMap::new(),
        };

        let mut seen = HashSet::with_capacity(records.len());
        let mut station_dates: HashMap<(String, u64, u64, u64), Vec<NaiveDate>> = HashMap::new();

        for record in records {
            if !seen.insert(record.key()) {
                report.duplicate_keys += 1;
            }
            station_dates
                .entry((
                    record.station.clone(),
                    record.latitude.to_bits(),
                    record.longitude.to_bits(),
                    record.elevation.to_bits(),
                ))
                .or_default()
                .push(record.date);

            self.check_bounds(record, &mut report);
            self.count_missing(record, &mut report.missing_values);
        }

        report.stations = station_dates.len();

        let mut stations: Vec<_> = station_dates.into_iter().collect();
        stations.sort_by(|a, b| a.0.cmp(&b.0));
        for ((station, ..), mut dates) in stations {
            dates.sort_unstable();
            dates.dedup();
            self.check_time_series(&station, &dates, &mut report);
        }

        // Columns that never held a value were not loaded in this run
        report.missing_values.retain(|_, missing| *missing < records.len());

        report
    }

    fn check_bounds(&self, record: &DailyRecord, report: &mut IntegrityReport) {
        let mut push = |violation_type, details: String| {
            report.violations.push(BoundViolation {
                station: record.station.clone(),
                date: record.date,
                violation_type,
                details,
            });
        };

        if let Some(humidity) = record.humidity.filter(|h| *h > MAX_HUMIDITY) {
            push(
                ViolationType::HumidityAboveMaximum,
                format!("humidity {} exceeds {}", humidity, MAX_HUMIDITY),
            );
        }
        if let Some(wind) = record.wind_speed.filter(|w| *w < 0.0) {
            push(ViolationType::NegativeWind, format!("wind speed {} is negative", wind));
        }
        if let Some(rain) = record.precipitation.filter(|p| *p < 0.0) {
            push(
                ViolationType::NegativePrecipitation,
                format!("precipitation {} is negative", rain),
            );
        }
        if let Some(radiation) = record.radiation_kj.filter(|r| *r < MIN_RADIATION_KJ) {
            push(
                ViolationType::RadiationBelowMinimum,
                format!("radiation {} kJ is below {}", radiation, MIN_RADIATION_KJ),
            );
        }
        if let (Some(min), Some(max)) = (record.temp_min, record.temp_max) {
            if min > max {
                push(
                    ViolationType::MinAboveMax,
                    format!("tasmin {} exceeds tasmax {}", min, max),
                );
            }
        }
    }

    fn count_missing(&self, record: &DailyRecord, missing: &mut BTreeMap<String, usize>) {
        let fields = [
            ("rss_kJ/m2d", record.radiation_kj),
            ("rss_MJ/m2/d", record.radiation_mj),
            ("tasmax", record.temp_max),
            ("tasmin", record.temp_min),
            ("pr", record.precipitation),
            ("sfcWind", record.wind_speed),
            ("hur_%", record.humidity),
            ("hu_kPa", record.vapor_pressure),
            ("Wind_km/h", record.wind_kmh),
            ("CO2ppm", record.co2_ppm),
        ];
        for (name, value) in fields {
            let count = missing.entry(name.to_string()).or_insert(0);
            if value.is_none() {
                *count += 1;
            }
        }
    }

    /// Gaps between consecutive dates of one station
    fn check_time_series(&self, station: &str, dates: &[NaiveDate], report: &mut IntegrityReport) {
        for window in dates.windows(2) {
            let (prev, next) = (window[0], window[1]);
            let step = (next - prev).num_days();
            if step <= 1 {
                continue;
            }
            if is_leap_day_gap(prev, next) {
                report.leap_day_gaps += 1;
            } else {
                report.date_gaps.push(DateGap {
                    station: station.to_string(),
                    after: prev,
                    before: next,
                    missing_days: step - 1,
                });
            }
        }
    }

    /// Generate a summary report
    pub fn generate_summary(&self, report: &IntegrityReport) -> String {
        let mut summary = String::new();

        summary.push_str("=== Integrity Check Report ===\n");
        summary.push_str(&format!("Total Records: {}\n", report.total_records));
        summary.push_str(&format!("Stations: {}\n", report.stations));
        summary.push_str(&format!("Duplicate Keys: {}\n", report.duplicate_keys));
        summary.push_str(&format!("Date Gaps: {}\n", report.date_gaps.len()));
        summary.push_str(&format!("Leap-Day Gaps: {}\n", report.leap_day_gaps));
        summary.push_str(&format!("\nBound Violations: {}\n", report.violations.len()));

        if !report.violations.is_empty() {
            summary.push_str("\nTop 10 Violations:\n");
            for (i, violation) in report.violations.iter().take(10).enumerate() {
                summary.push_str(&format!(
                    "  {}. {} on {}: {}\n",
                    i + 1,
                    violation.station,
                    violation.date,
                    violation.details
                ));
            }
        }

        if !report.date_gaps.is_empty() {
            summary.push_str("\nFirst 10 Gaps:\n");
            for gap in report.date_gaps.iter().take(10) {
                summary.push_str(&format!(
                    "  {}: {} day(s) missing between {} and {}\n",
                    gap.station, gap.missing_days, gap.after, gap.before
                ));
            }
        }

        let incomplete: Vec<_> = report
            .missing_values
            .iter()
            .filter(|(_, missing)| **missing > 0)
            .collect();
        if !incomplete.is_empty() {
            summary.push_str("\nMissing Values:\n");
            for (column, missing) in incomplete {
                summary.push_str(&format!("  {}: {}\n", column, missing));
            }
        }

        summary
    }
}

impl Default for IntegrityChecker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Station;

    fn record(station: &Station, y: i32, m: u32, d: u32) -> DailyRecord {
        let mut r = DailyRecord::new(station, NaiveDate::from_ymd_opt(y, m, d).unwrap());
        r.temp_max = Some(30.0);
        r.temp_min = Some(20.0);
        r
    }

    fn piracicaba() -> Station {
        Station::new("Piracicaba".to_string(), -22.7, -47.63, 546.0)
    }

    #[test]
    fn test_clean_table() {
        let station = piracicaba();
        let records: Vec<_> = (1..=5).map(|d| record(&station, 2015, 1, d)).collect();
        let report = IntegrityChecker::new().check_integrity(&records);

        assert!(report.is_clean());
        assert_eq!(report.stations, 1);
        assert_eq!(report.total_records, 5);
        assert_eq!(report.missing_values.get("tasmax"), Some(&0));
        // Never-loaded columns are not reported
        assert!(!report.missing_values.contains_key("pr"));
    }

    #[test]
    fn test_duplicates_and_gaps() {
        let station = piracicaba();
        let records = vec![
            record(&station, 2015, 1, 1),
            record(&station, 2015, 1, 1),
            record(&station, 2015, 1, 4),
            record(&station, 2016, 2, 28),
            record(&station, 2016, 3, 1),
        ];
        let report = IntegrityChecker::new().check_integrity(&records);

        assert_eq!(report.duplicate_keys, 1);
        assert_eq!(report.leap_day_gaps, 1);
        assert_eq!(report.date_gaps.len(), 2);
        assert_eq!(report.date_gaps[0].missing_days, 2);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_bound_violations() {
        let station = piracicaba();
        let mut bad = record(&station, 2015, 1, 1);
        bad.humidity = Some(101.0);
        bad.wind_speed = Some(-1.0);
        bad.precipitation = Some(-0.5);
        bad.radiation_kj = Some(1.0);
        bad.temp_min = Some(31.0);

        let report = IntegrityChecker::new().check_integrity(&[bad]);
        let types: Vec<_> = report.violations.iter().map(|v| v.violation_type).collect();
        assert_eq!(
            types,
            vec![
                ViolationType::HumidityAboveMaximum,
                ViolationType::NegativeWind,
                ViolationType::NegativePrecipitation,
                ViolationType::RadiationBelowMinimum,
                ViolationType::MinAboveMax,
            ]
        );

        let summary = IntegrityChecker::new().generate_summary(&report);
        assert!(summary.contains("Bound Violations: 5"));
    }
}
