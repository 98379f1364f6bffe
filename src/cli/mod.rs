pub mod args;
pub mod commands;

pub use args::{Cli, Commands, RunFilters};
pub use commands::run;
