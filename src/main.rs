use clap::Parser;
use climbra_stations::cli::{run, Cli};
use climbra_stations::error::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}
