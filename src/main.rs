//! Command-line entry point for dashmart.
//!
//! ```bash
//! dashmart build --input data.csv --database warehouse.duckdb
//! dashmart inspect --input data.csv --threshold 20
//! ```

#![warn(clippy::all, rust_2018_idioms)]
#![allow(clippy::print_stdout)] // CLI output belongs on stdout

mod cli;

use clap::Parser as _;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dashmart::logging::init()?;

    let cli = cli::Cli::parse();
    cli::run_command(cli.command)?;

    Ok(())
}
