//! CLI argument definitions.

use crate::config::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Camera-trap survey statistics from deployment and detection tables.
#[derive(Debug, Parser)]
#[command(name = "trapstat")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Common options for survey runs.
    #[command(flatten)]
    pub survey: SurveyArgs,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Export the operational calendar matrix (station x date).
    Calendar {
        /// Input and analysis options.
        #[command(flatten)]
        args: SurveyArgs,
    },
    /// Validate inputs and print the diagnostics report without writing exports.
    Check {
        /// Input and analysis options.
        #[command(flatten)]
        args: SurveyArgs,
    },
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Arguments shared by survey, calendar and check runs.
#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct SurveyArgs {
    /// Deployment table (Station, Camera, Debut, Fin).
    #[arg(short, long, env = "TRAPSTAT_DEPLOYMENTS")]
    pub deployments: Option<PathBuf>,

    /// Detection table (Station, Camera, Species, DateTimeOriginal).
    #[arg(short = 'r', long, env = "TRAPSTAT_DETECTIONS")]
    pub detections: Option<PathBuf>,

    /// Independence threshold between detections, in minutes.
    #[arg(short = 't', long, value_parser = parse_threshold, env = "TRAPSTAT_THRESHOLD")]
    pub threshold_min: Option<i64>,

    /// Count setup and retrieval days as half effort days.
    #[arg(long)]
    pub half_days: bool,

    /// Build the calendar per camera instead of per station.
    #[arg(long)]
    pub by_camera: bool,

    /// Output formats (comma-separated: csv,json).
    #[arg(short, long, value_delimiter = ',', env = "TRAPSTAT_FORMAT")]
    pub format: Option<Vec<OutputFormat>>,

    /// Output directory (default: current directory).
    #[arg(short, long, env = "TRAPSTAT_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Date format for the deployment table (chrono syntax).
    #[arg(long, env = "TRAPSTAT_DATE_FORMAT")]
    pub date_format: Option<String>,

    /// Datetime format for the detection table (chrono syntax).
    #[arg(long, env = "TRAPSTAT_DATETIME_FORMAT")]
    pub datetime_format: Option<String>,

    /// Abort on the first malformed input row.
    #[arg(long)]
    pub strict: bool,

    /// Overwrite output files if they exist.
    #[arg(long)]
    pub force: bool,

    /// Do not write a UTF-8 BOM at the start of CSV exports.
    #[arg(long)]
    pub no_csv_bom: bool,

    /// Suppress informational output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity (-v: debug, -vv: trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Parse and validate the independence threshold.
fn parse_threshold(s: &str) -> Result<i64, String> {
    let value: i64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number of minutes"))?;

    if value <= 0 {
        return Err(format!("threshold must be positive, got {value}"));
    }

    Ok(value)
}
