use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

mod combine;
mod info;
mod rounds;

/// aqalign - Air-Quality Sensor Series Alignment
#[derive(Parser)]
#[command(name = "aqalign")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Elementwise combination operation.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OpArg {
    /// first - second (background correction)
    Subtract,
    /// first + second
    Add,
    /// first / second (enhancement ratio)
    Divide,
    /// Elementwise mean across all sensors
    Average,
    /// Elementwise median across all sensors
    Median,
}

impl OpArg {
    /// Binary operations take exactly two sensors.
    pub fn is_binary(self) -> bool {
        matches!(self, OpArg::Subtract | OpArg::Add | OpArg::Divide)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a sensor CSV
    Info {
        /// Input sensor CSV path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Header name of the measured-parameter column
        #[arg(short = 'c', long)]
        value_column: String,

        /// Header name of the time column
        #[arg(short = 't', long, default_value = "Time")]
        time_column: String,

        /// Preamble lengths to try, in order (AQY exports: 6,0)
        #[arg(long, value_delimiter = ',', default_value = "0")]
        skip_rows: Vec<usize>,

        /// Emit the summary as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Bucket a sensor's readings into the experiment's rounds
    Rounds {
        /// Experiment TOML config
        #[arg(long, value_name = "FILE")]
        config: PathBuf,

        /// Sensor name from the config
        #[arg(short, long)]
        sensor: String,

        /// Write a label,time,value CSV here instead of printing a summary
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Align sensors onto a common grid and combine them elementwise
    Combine {
        /// Experiment TOML config
        #[arg(long, value_name = "FILE")]
        config: PathBuf,

        /// Operation to apply
        #[arg(long, value_enum)]
        op: OpArg,

        /// Sensor names from the config; binary operations take exactly two,
        /// and the first sensor supplies the output time grid
        #[arg(short, long, value_name = "NAME", num_args = 1..)]
        sensors: Vec<String>,

        /// Restrict to one round label instead of the whole run
        #[arg(short, long)]
        round: Option<i64>,

        /// Output time,value CSV
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Info {
            file,
            value_column,
            time_column,
            skip_rows,
            json,
        } => info::run(file, time_column, value_column, skip_rows, json),
        Commands::Rounds {
            config,
            sensor,
            output,
        } => rounds::run(config, sensor, output),
        Commands::Combine {
            config,
            op,
            sensors,
            round,
            output,
        } => combine::run(config, op, sensors, round, output),
    }
}
