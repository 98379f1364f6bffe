use crate::error::{ProcessingError, Result};
use crate::models::ClimateVariable;
use crate::utils::calendar::Calendar;
use crate::utils::constants::FILL_VALUE_THRESHOLD;
use crate::utils::coordinates::{nearest_index, normalize_longitude};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Time series of one grid cell, sliced from a start date
#[derive(Debug, Clone, PartialEq)]
pub struct PointSeries {
    pub grid_latitude: f64,
    pub grid_longitude: f64,
    pub calendar: Calendar,
    pub dates: Vec<NaiveDate>,
    pub values: Vec<Option<f64>>,
}

/// A gridded (time, lat, lon) variable that can be sampled at a point
pub trait GridSource {
    fn variable(&self) -> ClimateVariable;

    /// Series of the grid cell nearest to the point, from `start` to the end
    /// of the time axis.
    fn sample_point(&self, latitude: f64, longitude: f64, start: NaiveDate)
        -> Result<PointSeries>;
}

/// Opens gridded files; a missing file is `Ok(None)`.
pub trait GridOpener: Sync {
    fn open(&self, path: &Path, variable: ClimateVariable)
        -> Result<Option<Box<dyn GridSource>>>;
}

/// Index of the first date on or after `start` in an ascending axis
pub fn time_slice_start(dates: &[NaiveDate], start: NaiveDate) -> usize {
    dates.partition_point(|date| *date < start)
}

/// Maps fill values and non-finite cells to `None`
pub fn clean_value(value: f64, fill_values: &[f64]) -> Option<f64> {
    if !value.is_finite()
        || value.abs() >= FILL_VALUE_THRESHOLD
        || fill_values.iter().any(|fill| *fill == value)
    {
        None
    } else {
        Some(value)
    }
}

/// Fully loaded grid stored time-major as `[time][lat][lon]`
#[derive(Debug, Clone)]
pub struct MemoryGrid {
    variable: ClimateVariable,
    latitudes: Vec<f64>,
    longitudes: Vec<f64>,
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
    calendar: Calendar,
}

impl MemoryGrid {
    pub fn new(
        variable: ClimateVariable,
        latitudes: Vec<f64>,
        longitudes: Vec<f64>,
        dates: Vec<NaiveDate>,
        values: Vec<f64>,
    ) -> Result<Self> {
        let expected = latitudes.len() * longitudes.len() * dates.len();
        if values.len() != expected {
            return Err(ProcessingError::InvalidFormat(format!(
                "{} grid has {} values, expected {}",
                variable,
                values.len(),
                expected
            )));
        }
        Ok(Self {
            variable,
            latitudes,
            longitudes,
            dates,
            values,
            calendar: Calendar::Gregorian,
        })
    }

    /// Grid with every cell following the same per-day function
    pub fn from_fn(
        variable: ClimateVariable,
        latitudes: Vec<f64>,
        longitudes: Vec<f64>,
        dates: Vec<NaiveDate>,
        mut value: impl FnMut(usize, usize, usize) -> f64,
    ) -> Self {
        let mut values = Vec::with_capacity(latitudes.len() * longitudes.len() * dates.len());
        for t in 0..dates.len() {
            for i in 0..latitudes.len() {
                for j in 0..longitudes.len() {
                    values.push(value(t, i, j));
                }
            }
        }
        Self {
            variable,
            latitudes,
            longitudes,
            dates,
            values,
            calendar: Calendar::Gregorian,
        }
    }

    pub fn with_calendar(mut self, calendar: Calendar) -> Self {
        self.calendar = calendar;
        self
    }
}

impl GridSource for MemoryGrid {
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

        let cells_per_step = self.latitudes.len() * self.longitudes.len();
        let offset = lat_index * self.longitudes.len() + lon_index;
        let values = (first..self.dates.len())
            .map(|t| clean_value(self.values[t * cells_per_step + offset], &[]))
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

/// Serves in-memory grids keyed by the path they stand in for
#[derive(Debug, Clone, Default)]
pub struct MemoryGridOpener {
    grids: HashMap<PathBuf, MemoryGrid>,
}

impl MemoryGridOpener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, grid: MemoryGrid) {
        self.grids.insert(path.into(), grid);
    }
}

impl GridOpener for MemoryGridOpener {
    fn open(
        &self,
        path: &Path,
        variable: ClimateVariable,
    ) -> Result<Option<Box<dyn GridSource>>> {
        match self.grids.get(path) {
            Some(grid) if grid.variable == variable => Ok(Some(Box::new(grid.clone()))),
            Some(grid) => Err(ProcessingError::InvalidFormat(format!(
                "{} holds {}, expected {}",
                path.display(),
                grid.variable,
                variable
            ))),
            None => Ok(None),
        }
    }
}
