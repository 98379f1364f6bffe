use crate::error::Result;
use crate::models::{ClimateVariable, DailyRecord};
use crate::utils::format::format_float;
use std::fs;
use std::path::Path;

/// A column of the extracted table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputColumn {
    City,
    Latitude,
    Longitude,
    Altitude,
    Day,
    Month,
    Year,
    Date,
    RadiationKj,
    RadiationMj,
    TempMax,
    TempMin,
    Precipitation,
    Wind,
    Humidity,
    VaporPressure,
    WindKmh,
    YearDay,
    Co2,
}

impl OutputColumn {
    const IDENTITY: [OutputColumn; 8] = [
        OutputColumn::City,
        OutputColumn::Latitude,
        OutputColumn::Longitude,
        OutputColumn::Altitude,
        OutputColumn::Day,
        OutputColumn::Month,
        OutputColumn::Year,
        OutputColumn::Date,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            OutputColumn::City => "City",
            OutputColumn::Latitude => "Latitude",
            OutputColumn::Longitude => "Longitude",
            OutputColumn::Altitude => "Altitude",
            OutputColumn::Day => "DD",
            OutputColumn::Month => "MM",
            OutputColumn::Year => "YYYY",
            OutputColumn::Date => "Date",
            OutputColumn::RadiationKj => "rss_kJ/m2d",
            OutputColumn::RadiationMj => "rss_MJ/m2/d",
            OutputColumn::TempMax => "tasmax",
            OutputColumn::TempMin => "tasmin",
            OutputColumn::Precipitation => "pr",
            OutputColumn::Wind => "sfcWind",
            OutputColumn::Humidity => "hur_%",
            OutputColumn::VaporPressure => "hu_kPa",
            OutputColumn::WindKmh => "Wind_km/h",
            OutputColumn::YearDay => "YYYYDDD",
            OutputColumn::Co2 => "CO2ppm",
        }
    }

    pub fn value(&self, record: &DailyRecord) -> String {
        match self {
            OutputColumn::City => record.station.clone(),
            OutputColumn::Latitude => format_float(Some(record.latitude)),
            OutputColumn::Longitude => format_float(Some(record.longitude)),
            OutputColumn::Altitude => format_float(Some(record.elevation)),
            OutputColumn::Day => record.day().to_string(),
            OutputColumn::Month => record.month().to_string(),
            OutputColumn::Year => record.year().to_string(),
            OutputColumn::Date => record.date.format("%Y-%m-%d").to_string(),
            OutputColumn::RadiationKj => format_float(record.radiation_kj),
            OutputColumn::RadiationMj => format_float(record.radiation_mj),
            OutputColumn::TempMax => format_float(record.temp_max),
            OutputColumn::TempMin => format_float(record.temp_min),
            OutputColumn::Precipitation => format_float(record.precipitation),
            OutputColumn::Wind => format_float(record.wind_speed),
            OutputColumn::Humidity => format_float(record.humidity),
            OutputColumn::VaporPressure => format_float(record.vapor_pressure),
            OutputColumn::WindKmh => format_float(record.wind_kmh),
            OutputColumn::YearDay => record.year_day_code().to_string(),
            OutputColumn::Co2 => format_float(record.co2_ppm),
        }
    }

    fn for_variable(variable: ClimateVariable) -> &'static [OutputColumn] {
        match variable {
            ClimateVariable::Radiation => &[OutputColumn::RadiationKj, OutputColumn::RadiationMj],
            ClimateVariable::MaxTemperature => &[OutputColumn::TempMax],
            ClimateVariable::MinTemperature => &[OutputColumn::TempMin],
            ClimateVariable::Precipitation => &[OutputColumn::Precipitation],
            ClimateVariable::Wind => &[OutputColumn::Wind],
            ClimateVariable::Humidity => &[OutputColumn::Humidity],
        }
    }
}

/// Writes the extracted table with the columns of the variables that loaded
pub struct ExtractedCsvWriter {
    columns: Vec<OutputColumn>,
}

impl ExtractedCsvWriter {
    /// `loaded` is in merge order.
    pub fn new(
        loaded: &[ClimateVariable],
        vapor_pressure: bool,
        wind_kmh: bool,
        co2: bool,
    ) -> Self {
        let mut columns = OutputColumn::IDENTITY.to_vec();
        for variable in loaded {
            columns.extend_from_slice(OutputColumn::for_variable(*variable));
        }
        if vapor_pressure {
            columns.push(OutputColumn::VaporPressure);
        }
        if wind_kmh {
            columns.push(OutputColumn::WindKmh);
        }
        columns.push(OutputColumn::YearDay);
        if co2 {
            columns.push(OutputColumn::Co2);
        }
        Self { columns }
    }

    pub fn headers(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.header()).collect()
    }

    /// Write records to a CSV file, creating its directory
    pub fn write_records(&self, records: &[DailyRecord], path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(self.headers())?;
        for record in records {
            writer.write_record(self.columns.iter().map(|c| c.value(record)))?;
        }
        writer.flush()?;

        Ok(())
    }
}
