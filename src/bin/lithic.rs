//! # Lithic CLI Entry Point
//!
//! ## Usage
//!
//! ```bash
//! # Catalog information
//! lithic sample.db .dbinfo
//! lithic sample.db .tables
//!
//! # Restricted SELECT
//! lithic sample.db "SELECT COUNT(*) FROM apples"
//! lithic sample.db "SELECT name, color FROM apples WHERE color = 'Red'"
//! ```
//!
//! Diagnostics go to stdout and exit with a non-zero status; success
//! prints the result lines and exits 0.

use eyre::{bail, Result};
use std::env;

use lithic::{cli, Database};

fn main() {
    if let Err(e) = run() {
        println!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() != 3 {
        bail!("usage: lithic <database-path> <command>");
    }

    let db = Database::open(&args[1])?;
    for line in cli::run(&db, &args[2])? {
        println!("{}", line);
    }

    Ok(())
}
