pub mod calendar;
pub mod constants;
pub mod coordinates;
pub mod filename;
pub mod format;
pub mod progress;

pub use constants::*;
pub use coordinates::{nearest_index, normalize_longitude};
pub use format::format_float;
pub use progress::ProgressReporter;
