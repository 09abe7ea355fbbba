//! # aqalign CLI
//!
//! Command-line front end for batch alignment of air-quality sensor series.
//!
//! ## Usage
//!
//! ```bash
//! # Summarize one sensor CSV
//! aqalign info exp5_data/PA1.csv --value-column pm2_5_atm --time-column UTCDateTime
//!
//! # Bucket a sensor's readings into the experiment's rounds
//! aqalign rounds --config exp5.toml --sensor PA1 -o pa1_rounds.csv
//!
//! # Background-correct the near sensor against the distant one
//! aqalign combine --config exp5.toml --op subtract --sensors PA1 PA4 -o diff.csv
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
