//! Settlement Engine CLI
//!
//! Reads party balances (optionally with parent links) from CSV and prints
//! the transfers that settle them.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- [--sorted] [--scale N] balances.csv > transfers.csv
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity
//! - `SETTLE_SCALE`: Default number of decimal places in amounts (2)

use settle_engine::{Config, Result, SettleEngine};
use std::fs::File;
use std::io::{self, BufReader};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = Config::from_env()?;

    let file = File::open(&config.input)?;
    let reader = BufReader::new(file);

    let mut engine = SettleEngine::from_config(&config);
    engine.process_csv(reader)?;

    let stdout = io::stdout();
    let handle = stdout.lock();
    engine.write_output(handle)?;

    Ok(())
}
