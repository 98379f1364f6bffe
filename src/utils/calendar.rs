use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::error::{ProcessingError, Result};

const SECONDS_PER_DAY: f64 = 86_400.0;
/// Roughly 100 000 years; fill values on a time axis land far beyond this
const MAX_OFFSET_SECONDS: f64 = 3.2e12;
const NOLEAP_MONTH_DAYS: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Calendars a CF time axis can be decoded from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Calendar {
    /// `standard`, `gregorian`, `proleptic_gregorian`
    Gregorian,
    /// `noleap`, `365_day`: no year has a 29 February
    NoLeap,
}

impl Calendar {
    pub fn parse(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "" | "standard" | "gregorian" | "proleptic_gregorian" => Ok(Calendar::Gregorian),
            "noleap" | "365_day" => Ok(Calendar::NoLeap),
            other => Err(ProcessingError::UnsupportedCalendar(other.to_string())),
        }
    }

    pub fn has_leap_days(&self) -> bool {
        matches!(self, Calendar::Gregorian)
    }
}

/// Decoder for a CF `<unit> since <reference>` time axis
#[derive(Debug, Clone, PartialEq)]
pub struct CfTime {
    unit_seconds: f64,
    reference: NaiveDateTime,
    calendar: Calendar,
}

impl CfTime {
    pub fn parse(units: &str, calendar: Calendar) -> Result<Self> {
        let (unit, reference) = units
            .split_once(" since ")
            .ok_or_else(|| ProcessingError::InvalidTimeUnits(units.to_string()))?;

        let unit_seconds = match unit.trim().to_lowercase().as_str() {
            "days" | "day" | "d" => SECONDS_PER_DAY,
            "hours" | "hour" | "h" => 3_600.0,
            "minutes" | "minute" | "min" => 60.0,
            "seconds" | "second" | "s" => 1.0,
            _ => return Err(ProcessingError::InvalidTimeUnits(units.to_string())),
        };

        let reference = parse_reference(reference)
            .ok_or_else(|| ProcessingError::InvalidTimeUnits(units.to_string()))?;

        if calendar == Calendar::NoLeap && reference.month() == 2 && reference.day() == 29 {
            return Err(ProcessingError::InvalidTimeUnits(format!(
                "{} has no 29 February in a noleap calendar",
                units
            )));
        }

        Ok(Self {
            unit_seconds,
            reference,
            calendar,
        })
    }

    /// Calendar day holding the instant `value` units after the reference
    pub fn decode(&self, value: f64) -> Result<NaiveDate> {
        let out_of_range =
            || ProcessingError::InvalidFormat(format!("Time value {} out of range", value));

        let seconds = value * self.unit_seconds;
        if !seconds.is_finite() || seconds.abs() > MAX_OFFSET_SECONDS {
            return Err(out_of_range());
        }
        let offset_seconds = seconds.round() as i64;

        match self.calendar {
            Calendar::Gregorian => {
                let offset = Duration::try_seconds(offset_seconds).ok_or_else(out_of_range)?;
                self.reference
                    .checked_add_signed(offset)
                    .map(|dt| dt.date())
                    .ok_or_else(out_of_range)
            }
            Calendar::NoLeap => {
                let seconds_into_day = self.reference.time().num_seconds_from_midnight() as i64;
                let day_offset = (offset_seconds + seconds_into_day).div_euclid(86_400);
                let start = noleap_day_of_year(self.reference.date()) as i64 + day_offset;

                let year = self.reference.year() as i64 + start.div_euclid(365);
                let day_of_year = start.rem_euclid(365) as u32;
                noleap_date(year as i32, day_of_year).ok_or_else(out_of_range)
            }
        }
    }
}

fn parse_reference(text: &str) -> Option<NaiveDateTime> {
    let cleaned = text
        .trim()
        .trim_end_matches("UTC")
        .trim_end_matches('Z')
        .trim()
        .replace('T', " ");
    let mut parts = cleaned.split_whitespace();

    let date = NaiveDate::parse_from_str(parts.next()?, "%Y-%m-%d").ok()?;
    let time = match parts.next() {
        None => NaiveTime::from_hms_opt(0, 0, 0)?,
        Some(t) => ["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"]
            .iter()
            .find_map(|fmt| NaiveTime::parse_from_str(t, fmt).ok())?,
    };
    Some(date.and_time(time))
}

/// Zero-based day of year counted on a 365-day calendar
fn noleap_day_of_year(date: NaiveDate) -> u32 {
    let before: u32 = NOLEAP_MONTH_DAYS[..date.month0() as usize].iter().sum();
    before + date.day0()
}

fn noleap_date(year: i32, mut day_of_year: u32) -> Option<NaiveDate> {
    for (month0, &length) in NOLEAP_MONTH_DAYS.iter().enumerate() {
        if day_of_year < length {
            return NaiveDate::from_ymd_opt(year, month0 as u32 + 1, day_of_year + 1);
        }
        day_of_year -= length;
    }
    None
}

/// True when `next` follows `previous` by skipping only 29 February
pub fn is_leap_day_gap(previous: NaiveDate, next: NaiveDate) -> bool {
    match previous.succ_opt() {
        Some(skipped) => {
            skipped.month() == 2 && skipped.day() == 29 && skipped.succ_opt() == Some(next)
        }
        None => false,
    }
}
