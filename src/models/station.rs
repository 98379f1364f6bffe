use serde::{Deserialize, Serialize};
use validator::Validate;

/// A point location that gridded data is sampled at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Station {
    #[validate(length(min = 1))]
    pub name: String,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    /// Metres above sea level
    pub elevation: f64,
}

impl Station {
    pub fn new(name: String, latitude: f64, longitude: f64, elevation: f64) -> Self {
        Self {
            name,
            latitude,
            longitude,
            elevation,
        }
    }
}
