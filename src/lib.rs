//! Trapstat - camera-trap survey statistics CLI tool.
//!
//! This crate derives per-station camera-operation calendars and
//! independent-event survey reports from deployment and detection tables.

#![warn(missing_docs)]

pub mod calendar;
pub mod cli;
pub mod config;
pub mod constants;
pub mod deploy;
pub mod detect;
pub mod diagnostics;
pub mod error;
pub mod events;
pub mod output;
pub mod pipeline;
pub mod survey;

use clap::{CommandFactory, Parser};
use cli::{Cli, Command, ConfigAction, SurveyArgs};
use config::{Config, Granularity, load_default_config, save_default_config};
use pipeline::RunOptions;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub use error::{Error, Result};

/// Main entry point for trapstat CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let args = match &cli.command {
        Some(Command::Calendar { args } | Command::Check { args }) => args,
        _ => &cli.survey,
    };
    init_logging(args.verbose, args.quiet);

    // Load configuration
    let config = load_default_config()?;

    match cli.command {
        Some(Command::Config { action }) => handle_config_command(action),
        Some(Command::Calendar { args }) => run_calendar_command(&args, &config),
        Some(Command::Check { args }) => run_check_command(&args, &config),
        None => {
            // Show help if no inputs provided
            if cli.survey.deployments.is_none() && cli.survey.detections.is_none() {
                Cli::command().print_help()?;
                return Ok(());
            }
            run_survey_command(&cli.survey, &config)
        }
    }
}

/// Run the full survey and write the configured exports.
fn run_survey_command(args: &SurveyArgs, config: &Config) -> Result<()> {
    let deployments = require_input(args.deployments.as_deref(), "deployments")?;
    let detections = require_input(args.detections.as_deref(), "detections")?;
    let options = resolve_run_options(args, config);

    let (analysis, outputs) = pipeline::run_survey(deployments, detections, &options)?;

    let flagged = analysis
        .events
        .iter()
        .filter(|event| event.out_of_operation)
        .count();
    info!(
        "Complete: {} record(s) collapsed into {} event(s) across {} station(s), {} file(s) written",
        analysis.records.len(),
        analysis.events.len(),
        analysis.registry.stations().count(),
        outputs.paths.len()
    );
    if flagged > 0 {
        warn!("{flagged} event(s) contain detections outside any deployment window");
    }
    if !analysis.diagnostics.is_clean() {
        warn!(
            "{} issue(s) recorded; run 'trapstat check' for the full report",
            analysis.diagnostics.total()
        );
    }

    Ok(())
}

/// Export the operational calendar matrix.
fn run_calendar_command(args: &SurveyArgs, config: &Config) -> Result<()> {
    let deployments = require_input(args.deployments.as_deref(), "deployments")?;
    let options = resolve_run_options(args, config);

    pipeline::run_calendar(deployments, &options)?;
    Ok(())
}

/// Validate inputs and print the diagnostics report without writing exports.
fn run_check_command(args: &SurveyArgs, config: &Config) -> Result<()> {
    let deployments = require_input(args.deployments.as_deref(), "deployments")?;
    let detections = require_input(args.detections.as_deref(), "detections")?;
    let options = resolve_run_options(args, config);

    let analysis = pipeline::analyze(deployments, detections, &options)?;

    println!(
        "{} deployment window(s), {} detection record(s), {} event(s)",
        analysis.registry.windows().len(),
        analysis.records.len(),
        analysis.events.len()
    );
    print!("{}", analysis.diagnostics.report());

    Ok(())
}

/// Combine CLI flags and configuration into resolved run options.
fn resolve_run_options(args: &SurveyArgs, config: &Config) -> RunOptions {
    RunOptions {
        threshold_minutes: args
            .threshold_min
            .unwrap_or(config.defaults.threshold_minutes),
        half_day_effort: args.half_days || config.defaults.half_day_effort,
        granularity: if args.by_camera {
            Granularity::Camera
        } else {
            config.defaults.granularity
        },
        formats: args
            .format
            .clone()
            .unwrap_or_else(|| config.defaults.formats.clone()),
        output_dir: args
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(".")),
        force: args.force,
        csv_bom: !args.no_csv_bom && config.output.csv_bom,
        strict: args.strict || config.defaults.strict,
        date_format: args
            .date_format
            .clone()
            .unwrap_or_else(|| config.input.date_format.clone()),
        datetime_format: args
            .datetime_format
            .clone()
            .unwrap_or_else(|| config.input.datetime_format.clone()),
        species: config.species.clone(),
        species_tag: config.input.species_tag.clone(),
    }
}

fn require_input<'a>(path: Option<&'a Path>, option: &str) -> Result<&'a Path> {
    path.ok_or_else(|| Error::MissingInput {
        option: option.to_string(),
    })
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter_str = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    fmt().with_env_filter(filter).init();
}

fn handle_config_command(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let path = config::config_file_path()?;
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                let config = Config::default();
                let saved_path = save_default_config(&config)?;
                println!("Created configuration file: {}", saved_path.display());
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_default_config()?;
            println!("{config:#?}");
            Ok(())
        }
        ConfigAction::Path => {
            let path = config::config_file_path()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}
