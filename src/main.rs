//! KBC statement CLI
//!
//! Reads a KBC CSV export and writes the normalized statement lines as CSV.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- export.csv > lines.csv
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `trace` to control logging verbosity

use kbcbe_statement::{KbcBePlugin, ParseError, Plugin, Statement, StatementParser};
use log::info;
use std::env;
use std::io;
use std::path::Path;
use std::process;
use thiserror::Error;

/// Errors reported by the command line front end.
#[derive(Error, Debug)]
enum CliError {
    /// Missing input file argument
    #[error("Missing input file argument. Usage: kbcbe-statement <input.csv>")]
    MissingArgument,

    /// Failed to open the input file
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(CliError::MissingArgument);
    }

    let input_path = Path::new(&args[1]);
    let mut parser = KbcBePlugin.get_parser(input_path)?;

    let mut statement = Statement::new();
    parser.parse(&mut statement)?;

    info!(
        "Account {} ({}): {} lines from {:?} to {:?}, net {}",
        statement.account_id.as_deref().unwrap_or("-"),
        statement.currency.as_deref().unwrap_or("-"),
        statement.lines.len(),
        statement.start_date(),
        statement.end_date(),
        statement.total()
    );

    let stdout = io::stdout();
    let handle = stdout.lock();
    statement.write_csv(handle)?;

    Ok(())
}
