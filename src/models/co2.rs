use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of an `atmospheric_<scenario>.co2.csv` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Co2Entry {
    #[serde(rename = "CO2year")]
    pub year: i32,
    #[serde(rename = "CO2ppm")]
    pub ppm: f64,
}

/// Atmospheric CO2 concentration by year for one scenario
#[derive(Debug, Clone, Default)]
pub struct Co2Series {
    by_year: BTreeMap<i32, f64>,
}

impl Co2Series {
    /// Builds the series, keeping the first entry seen for each year.
    pub fn from_entries(entries: impl IntoIterator<Item = Co2Entry>) -> Self {
        let mut by_year = BTreeMap::new();
        for entry in entries {
            by_year.entry(entry.year).or_insert(entry.ppm);
        }
        Self { by_year }
    }

    pub fn concentration(&self, year: i32) -> Option<f64> {
        self.by_year.get(&year).copied()
    }

    pub fn len(&self) -> usize {
        self.by_year.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_year.is_empty()
    }
}
