use std::path::{Path, PathBuf};

use crate::models::{ClimateVariable, Scenario};

/// `<gridded_dir>/<model>/<scenario>/<model>-<variable>-<scenario>.nc`
pub fn gridded_file(
    gridded_dir: &Path,
    model: &str,
    scenario: Scenario,
    variable: ClimateVariable,
) -> PathBuf {
    gridded_dir
        .join(model)
        .join(scenario.as_str())
        .join(format!("{}-{}-{}.nc", model, variable, scenario))
}

/// `<co2_dir>/atmospheric_<scenario>.co2.csv`
pub fn co2_file(co2_dir: &Path, scenario: Scenario) -> PathBuf {
    co2_dir.join(format!("atmospheric_{}.co2.csv", scenario))
}

/// `<extracted_dir>/climate_<station_count>_<model>_<scenario>.csv`
pub fn extracted_file(
    extracted_dir: &Path,
    station_count: usize,
    model: &str,
    scenario: Scenario,
) -> PathBuf {
    extracted_dir.join(format!(
        "climate_{}_{}_{}.csv",
        station_count, model, scenario
    ))
}

/// Per-run output directory `<base>/<model>/<scenario>`
pub fn run_output_dir(base: &Path, model: &str, scenario: Scenario) -> PathBuf {
    base.join(model).join(scenario.as_str())
}
