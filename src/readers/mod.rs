pub mod climate_reader;
pub mod co2_reader;
pub mod grid_reader;
#[cfg(feature = "netcdf")]
pub mod netcdf_reader;
pub mod station_reader;

pub use climate_reader::ClimateReader;
pub use co2_reader::Co2Reader;
pub use grid_reader::{GridOpener, GridSource, MemoryGrid, MemoryGridOpener, PointSeries};
#[cfg(feature = "netcdf")]
pub use netcdf_reader::{NetCdfGrid, NetCdfOpener};
pub use station_reader::StationReader;

use crate::error::{ProcessingError, Result};
use crate::models::ClimateVariable;
use std::path::Path;

/// Opener used when the crate is built with `--no-default-features`.
///
/// Missing files are still reported as absent so they can be skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedOpener;

impl GridOpener for UnsupportedOpener {
    fn open(
        &self,
        path: &Path,
        _variable: ClimateVariable,
    ) -> Result<Option<Box<dyn GridSource>>> {
        if !path.exists() {
            return Ok(None);
        }
        Err(ProcessingError::Config(format!(
            "cannot read {}: built without the `netcdf` feature",
            path.display()
        )))
    }
}

/// Gridded-file opener for this build
pub fn default_opener() -> Box<dyn GridOpener> {
    #[cfg(feature = "netcdf")]
    {
        Box::new(NetCdfOpener)
    }
    #[cfg(not(feature = "netcdf"))]
    {
        Box::new(UnsupportedOpener)
    }
}
