use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ProcessingError;

/// Emission scenario of a CLIMBra projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    Ssp245,
    Ssp585,
    Hist,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [Scenario::Ssp245, Scenario::Ssp585, Scenario::Hist];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::Ssp245 => "ssp245",
            Scenario::Ssp585 => "ssp585",
            Scenario::Hist => "hist",
        }
    }

    /// First day extracted from the gridded series
    pub fn start_date(&self) -> NaiveDate {
        match self {
            Scenario::Ssp245 | Scenario::Ssp585 => NaiveDate::from_ymd_opt(2015, 1, 1),
            Scenario::Hist => NaiveDate::from_ymd_opt(1980, 1, 1),
        }
        .unwrap_or_default()
    }

    /// Last two characters of the scenario name, used in DSSAT file names
    pub fn file_suffix(&self) -> &'static str {
        let name = self.as_str();
        &name[name.len() - 2..]
    }

    /// Two-digit first-year tag used in DSSAT file names
    pub fn year_tag(&self) -> &'static str {
        match self {
            Scenario::Hist => "80",
            Scenario::Ssp245 | Scenario::Ssp585 => "15",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scenario {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ssp245" => Ok(Scenario::Ssp245),
            "ssp585" => Ok(Scenario::Ssp585),
            "hist" => Ok(Scenario::Hist),
            _ => Err(ProcessingError::Config(format!("Unknown scenario: {}", s))),
        }
    }
}
