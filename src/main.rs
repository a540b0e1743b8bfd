//! Betting Settlement CLI
//!
//! Reads a CSV round log and prints who pays whom.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- rounds.csv
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use betting_settlement::{import_rounds, render_transfers, ExportOptions, LedgerError, Result};
use std::env;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(LedgerError::MissingArgument);
    }

    let input_path = &args[1];
    let file = File::open(input_path)?;
    let reader = BufReader::new(file);

    let ledger = import_rounds(reader)?;
    let plan = ledger.settle()?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    match render_transfers(&plan, &ExportOptions::default()) {
        Some(text) => writeln!(handle, "{}", text)?,
        None => writeln!(handle, "No transfers required.")?,
    }

    Ok(())
}
