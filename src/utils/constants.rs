/// Default input and output locations, relative to the working directory
pub const DEFAULT_STATIONS_FILE: &str = "data/Localidades.csv";
pub const DEFAULT_GRIDDED_DIR: &str = "data";
pub const DEFAULT_CO2_DIR: &str = "data";
pub const DEFAULT_EXTRACTED_DIR: &str = "data/OUTPUTS_EXTRACTED";
pub const DEFAULT_DSSAT_DIR: &str = "data/OUT_DSSAT_stations";
pub const DEFAULT_SWAP_DIR: &str = "data/OUT_SWAP_stations";

/// Global circulation models distributed with CLIMBra
pub const DEFAULT_MODELS: [&str; 10] = [
    "ACCESS-ESM1-5",
    "CMCC-ESM2",
    "EC-EARTH3",
    "INM-CM4_8",
    "INM-CM5",
    "IPSL-CM6A-LR",
    "MIROC6",
    "MPI-ESM1-2",
    "MRI-ESM2",
    "NorESM2-MM",
];

/// Unit conversions
pub const MJ_TO_KJ: f64 = 1000.0;
pub const MS_TO_KMH: f64 = 3.6;

/// Quality corrections
pub const MAX_HUMIDITY: f64 = 100.0;
pub const CLAMPED_HUMIDITY: f64 = 99.9;
pub const NEGATIVE_WIND_REPLACEMENT: f64 = 0.5;
pub const MIN_RADIATION_KJ: f64 = 3.0;

/// Tetens coefficients for saturation vapor pressure over water (kPa, °C)
pub const TETENS_A: f64 = 0.6108;
pub const TETENS_B: f64 = 17.27;
pub const TETENS_C: f64 = 237.3;

/// SWAP output
pub const ETREF_NOT_COMPUTED: f64 = -999.0;
pub const WET_DAY_THRESHOLD_MM: f64 = 5.0;
pub const SWAP_STATION_CHARS: usize = 6;

/// DSSAT output
pub const DSSAT_MISSING: f64 = -99.0;
pub const DSSAT_INSI_PREFIX: &str = "BR";

/// Values at or beyond this magnitude are treated as unset fill values
pub const FILL_VALUE_THRESHOLD: f64 = 1.0e20;
