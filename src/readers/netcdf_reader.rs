//! Gridded input backed by the system NetCDF library.

use crate::error::{ProcessingError, Result};
use crate::models::ClimateVariable;
use crate::readers::grid_reader::{
    clean_value, time_slice_start, GridOpener, GridSource, PointSeries,
};
use crate::utils::calendar::{Calendar, CfTime};
use crate::utils::coordinates::{nearest_index, normalize_longitude};
use chrono::NaiveDate;
use netcdf::AttributeValue;
use std::path::Path;
use tracing::debug;

const LATITUDE_NAMES: [&str; 2] = ["lat", "latitude"];
const LONGITUDE_NAMES: [&str; 2] = ["lon", "longitude"];
const TIME_NAME: &str = "time";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AxisOrder {
    TimeLatLon,
    TimeLonLat,
}

/// One variable of an open NetCDF file with its decoded axes
pub struct NetCdfGrid {
    file: netcdf::File,
    variable: ClimateVariable,
    order: AxisOrder,
    latitudes: Vec<f64>,
    longitudes: Vec<f64>,
    dates: Vec<NaiveDate>,
    calendar: Calendar,
    fill_values: Vec<f64>,
    scale_factor: f64,
    add_offset: f64,
}

impl NetCdfGrid {
    pub fn open(path: &Path, variable: ClimateVariable) -> Result<Self> {
        let file = netcdf::open(path)?;

        let (latitudes, lat_name) = read_axis(&file, &LATITUDE_NAMES)?;
        let (longitudes, lon_name) = read_axis(&file, &LONGITUDE_NAMES)?;
        let (dates, calendar) = read_time_axis(&file)?;

        let var = file.variable(variable.as_str()).ok_or_else(|| {
            ProcessingError::MissingData(format!(
                "variable {} not found in {}",
                variable,
                path.display()
            ))
        })?;

        let dims: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
        let order = match dims.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
            [t, a, b] if *t == TIME_NAME && *a == lat_name && *b == lon_name => {
                AxisOrder::TimeLatLon
            }
            [t, a, b] if *t == TIME_NAME && *a == lon_name && *b == lat_name => {
                AxisOrder::TimeLonLat
            }
            _ => {
                return Err(ProcessingError::InvalidFormat(format!(
                    "{} in {} has dimensions {:?}, expected (time, lat, lon)",
                    variable,
                    path.display(),
                    dims
                )))
            }
        };

        let fill_values = ["_FillValue", "missing_value"]
            .iter()
            .filter_map(|name| numeric_attribute(&var, name))
            .collect();
        let scale_factor = numeric_attribute(&var, "scale_factor").unwrap_or(1.0);
        let add_offset = numeric_attribute(&var, "add_offset").unwrap_or(0.0);

        debug!(
            path = %path.display(),
            variable = %variable,
            lats = latitudes.len(),
            lons = longitudes.len(),
            steps = dates.len(),
            "Opened gridded file"
        );

        drop(var);
        Ok(Self {
            file,
            variable,
            order,
            latitudes,
            longitudes,
            dates,
            calendar,
            fill_values,
            scale_factor,
            add_offset,
        })
    }
}

impl GridSource for NetCdfGrid {
    fn variable(&self) -> ClimateVariable {
        self.variable
    }

    fn sample_point(
        &self,
        latitude: f64,
        longitude: f64,
        start: NaiveDate,
    ) -> Result<PointSeries> {
        let lat_index = nearest_index(&self.latitudes, latitude)?;
        let lon_index =
            nearest_index(&self.longitudes, normalize_longitude(longitude, &self.longitudes))?;
        let first = time_slice_start(&self.dates, start);
        let steps = self.dates.len();

        let var = self.file.variable(self.variable.as_str()).ok_or_else(|| {
            ProcessingError::MissingData(format!("variable {} disappeared", self.variable))
        })?;

        let raw: Vec<f64> = if first == steps {
            Vec::new()
        } else {
            match self.order {
                AxisOrder::TimeLatLon => var.get_values::<f64, _>((first..steps, lat_index, lon_index))?,
                AxisOrder::TimeLonLat => var.get_values::<f64, _>((first..steps, lon_index, lat_index))?,
            }
        };

        let values = raw
            .into_iter()
            .map(|v| {
                clean_value(v, &self.fill_values).map(|v| v * self.scale_factor + self.add_offset)
            })
            .collect();

        Ok(PointSeries {
            grid_latitude: self.latitudes[lat_index],
            grid_longitude: self.longitudes[lon_index],
            calendar: self.calendar,
            dates: self.dates[first..].to_vec(),
            values,
        })
    }
}

/// Opens `<model>-<variable>-<scenario>.nc` files from disk
#[derive(Debug, Clone, Copy, Default)]
pub struct NetCdfOpener;

impl GridOpener for NetCdfOpener {
    fn open(
        &self,
        path: &Path,
        variable: ClimateVariable,
    ) -> Result<Option<Box<dyn GridSource>>> {
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(Box::new(NetCdfGrid::open(path, variable)?)))
    }
}

fn read_axis(file: &netcdf::File, names: &[&'static str]) -> Result<(Vec<f64>, &'static str)> {
    for name in names {
        if let Some(var) = file.variable(name) {
            return Ok((var.get_values::<f64, _>(..)?, name));
        }
    }
    Err(ProcessingError::MissingData(format!(
        "coordinate variable {} not found",
        names.join("/")
    )))
}

fn read_time_axis(file: &netcdf::File) -> Result<(Vec<NaiveDate>, Calendar)> {
    let var = file
        .variable(TIME_NAME)
        .ok_or_else(|| ProcessingError::MissingData("time variable not found".to_string()))?;

    let units = string_attribute(&var, "units")
        .ok_or_else(|| ProcessingError::MissingData("time units not set".to_string()))?;
    let calendar = Calendar::parse(&string_attribute(&var, "calendar").unwrap_or_default())?;
    let time = CfTime::parse(&units, calendar)?;

    let dates = var
        .get_values::<f64, _>(..)?
        .into_iter()
        .map(|value| time.decode(value))
        .collect::<Result<Vec<_>>>()?;

    Ok((dates, calendar))
}

fn has_attribute(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

fn numeric_attribute(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attribute(var, name) {
        return None;
    }
    let value = var.attribute_value(name)?.ok()?;
    f64::try_from(value).ok()
}

fn string_attribute(var: &netcdf::Variable, name: &str) -> Option<String> {
    if !has_attribute(var, name) {
        return None;
    }
    match var.attribute_value(name)?.ok()? {
        AttributeValue::Str(text) => Some(text),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    struct Fixture<'a> {
        lat_name: &'a str,
        lon_name: &'a str,
        latitudes: Vec<f64>,
        longitudes: Vec<f64>,
        time_units: &'a str,
        calendar: &'a str,
        times: Vec<f64>,
        dims: [&'a str; 3],
        values: Vec<f64>,
        attributes: Vec<(&'a str, f64)>,
    }

    fn write_fixture(path: &Path, fixture: &Fixture) -> Result<()> {
        let mut file = netcdf::create(path)?;
        file.add_dimension("time", fixture.times.len())?;
        file.add_dimension(fixture.lat_name, fixture.latitudes.len())?;
        file.add_dimension(fixture.lon_name, fixture.longitudes.len())?;

        {
            let mut time = file.add_variable::<f64>("time", &["time"])?;
            time.put_attribute("units", fixture.time_units)?;
            time.put_attribute("calendar", fixture.calendar)?;
            time.put_values(&fixture.times, ..)?;
        }
        {
            let mut lat = file.add_variable::<f64>(fixture.lat_name, &[fixture.lat_name])?;
            lat.put_attribute("units", "degrees_north")?;
            lat.put_values(&fixture.latitudes, ..)?;
        }
        {
            let mut lon = file.add_variable::<f64>(fixture.lon_name, &[fixture.lon_name])?;
            lon.put_attribute("units", "degrees_east")?;
            lon.put_values(&fixture.longitudes, ..)?;
        }
        {
            let mut var = file.add_variable::<f64>("pr", &fixture.dims)?;
            for (name, value) in &fixture.attributes {
                var.put_attribute(name, *value)?;
            }
            var.put_values(&fixture.values, ..)?;
        }
        Ok(())
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_time_lon_lat_order_with_long_axis_names() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("MIROC6-pr-ssp245.nc");

        // value = t * 100 + lon * 10 + lat, stored as (time, longitude, latitude)
        let mut values = Vec::new();
        for t in 0..4 {
            for lon in 0..3 {
                for lat in 0..2 {
                    values.push((t * 100 + lon * 10 + lat) as f64);
                }
            }
        }
        write_fixture(
            &path,
            &Fixture {
                lat_name: "latitude",
                lon_name: "longitude",
                latitudes: vec![-24.0, -23.5],
                longitudes: vec![313.0, 313.5, 314.0],
                time_units: "days since 2014-12-30",
                calendar: "standard",
                times: vec![0.0, 1.0, 2.0, 3.0],
                dims: ["time", "longitude", "latitude"],
                values,
                attributes: Vec::new(),
            },
        )?;

        let grid = NetCdfGrid::open(&path, ClimateVariable::Precipitation)?;
        let series = grid.sample_point(-23.55, -46.633, ymd(2015, 1, 1))?;

        assert_eq!(series.grid_latitude, -23.5);
        assert_eq!(series.grid_longitude, 313.5);
        assert_eq!(series.calendar, Calendar::Gregorian);
        assert_eq!(series.dates, vec![ymd(2015, 1, 1), ymd(2015, 1, 2)]);
        assert_eq!(series.values, vec![Some(211.0), Some(311.0)]);
        Ok(())
    }

    #[test]
    fn test_fill_values_masked_before_scaling() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("MIROC6-pr-ssp585.nc");
        write_fixture(
            &path,
            &Fixture {
                lat_name: "lat",
                lon_name: "lon",
                latitudes: vec![-23.5],
                longitudes: vec![-46.5],
                time_units: "hours since 2015-01-01 00:00:00",
                calendar: "noleap",
                times: vec![0.0, 24.0, 48.0, 72.0],
                dims: ["time", "lat", "lon"],
                values: vec![10.0, -999.0, -888.0, 20.0],
                attributes: vec![
                    ("_FillValue", -999.0),
                    ("missing_value", -888.0),
                    ("scale_factor", 0.5),
                    ("add_offset", 1.0),
                ],
            },
        )?;

        let grid = crate::readers::default_opener()
            .open(&path, ClimateVariable::Precipitation)?
            .expect("file exists");
        let series = grid.sample_point(-23.55, -46.633, ymd(2015, 1, 1))?;

        assert_eq!(series.calendar, Calendar::NoLeap);
        assert_eq!(series.dates.len(), 4);
        assert_eq!(series.dates[3], ymd(2015, 1, 4));
        assert_eq!(series.values, vec![Some(6.0), None, None, Some(11.0)]);
        Ok(())
    }

    #[test]
    fn test_unexpected_dimensions_are_rejected() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("MIROC6-pr-hist.nc");
        write_fixture(
            &path,
            &Fixture {
                lat_name: "lat",
                lon_name: "lon",
                latitudes: vec![-23.5],
                longitudes: vec![-46.5],
                time_units: "days since 1980-01-01",
                calendar: "gregorian",
                times: vec![0.0],
                dims: ["lat", "time", "lon"],
                values: vec![1.0],
                attributes: Vec::new(),
            },
        )?;

        assert!(matches!(
            NetCdfGrid::open(&path, ClimateVariable::Precipitation),
            Err(ProcessingError::InvalidFormat(_))
        ));
        Ok(())
    }

    #[test]
    fn test_opener_skips_missing_file() -> Result<()> {
        let dir = TempDir::new()?;
        let opened = NetCdfOpener.open(&dir.path().join("absent.nc"), ClimateVariable::Wind)?;
        assert!(opened.is_none());
        Ok(())
    }
}
