//! Run configuration shared by every pipeline stage.
//!
//! Values are layered: built-in defaults, then an optional configuration file,
//! then `CLIMBRA_*` environment variables. Command-line filters are applied on
//! top by the CLI.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ProcessingError, Result};
use crate::models::{ClimateVariable, Scenario};
use crate::utils::constants::{
    DEFAULT_CO2_DIR, DEFAULT_DSSAT_DIR, DEFAULT_EXTRACTED_DIR, DEFAULT_GRIDDED_DIR,
    DEFAULT_MODELS, DEFAULT_STATIONS_FILE, DEFAULT_SWAP_DIR,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub stations_file: PathBuf,
    pub gridded_dir: PathBuf,
    pub co2_dir: PathBuf,
    pub extracted_dir: PathBuf,
    pub dssat_dir: PathBuf,
    pub swap_dir: PathBuf,
    pub models: Vec<String>,
    pub scenarios: Vec<Scenario>,
    /// Merge order of the gridded variables
    pub variables: Vec<ClimateVariable>,
    pub workers: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            stations_file: PathBuf::from(DEFAULT_STATIONS_FILE),
            gridded_dir: PathBuf::from(DEFAULT_GRIDDED_DIR),
            co2_dir: PathBuf::from(DEFAULT_CO2_DIR),
            extracted_dir: PathBuf::from(DEFAULT_EXTRACTED_DIR),
            dssat_dir: PathBuf::from(DEFAULT_DSSAT_DIR),
            swap_dir: PathBuf::from(DEFAULT_SWAP_DIR),
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            scenarios: Scenario::ALL.to_vec(),
            variables: ClimateVariable::ALL.to_vec(),
            workers: num_cpus::get(),
        }
    }
}

impl RunConfig {
    /// Loads the layered configuration, reading `path` when given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&RunConfig::default())?);

        if let Some(path) = path {
            if !path.exists() {
                return Err(ProcessingError::Config(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(config::File::from(path));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("CLIMBRA")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("models")
                .with_list_parse_key("scenarios")
                .with_list_parse_key("variables"),
        );

        let config: RunConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Keeps only the listed models and scenarios; empty filters keep everything.
    pub fn with_filters(mut self, models: &[String], scenarios: &[Scenario]) -> Result<Self> {
        if !models.is_empty() {
            if let Some(unknown) = models.iter().find(|m| !self.models.contains(m)) {
                return Err(ProcessingError::Config(format!(
                    "Model {} is not configured",
                    unknown
                )));
            }
            self.models.retain(|m| models.contains(m));
        }
        if !scenarios.is_empty() {
            self.scenarios.retain(|s| scenarios.contains(s));
        }
        Ok(self)
    }

    pub fn with_workers(mut self, workers: Option<usize>) -> Self {
        if let Some(workers) = workers {
            self.workers = workers;
        }
        self
    }

    /// Every (model, scenario) pair in processing order
    pub fn runs(&self) -> Vec<(String, Scenario)> {
        self.models
            .iter()
            .flat_map(|model| self.scenarios.iter().map(move |s| (model.clone(), *s)))
            .collect()
    }

    fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(ProcessingError::Config(
                "workers must be at least 1".to_string(),
            ));
        }
        if self.variables.is_empty() {
            return Err(ProcessingError::Config(
                "at least one variable must be configured".to_string(),
            ));
        }
        Ok(())
    }
}
