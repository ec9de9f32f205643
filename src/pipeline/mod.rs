//! Analysis pipeline: load, validate, build, extract, aggregate, write.
//!
//! Inputs are loaded fully into memory before any computation; the
//! calendar, events and summary are recomputed in full on each run.

use std::path::{Path, PathBuf};

use chrono::Duration;
use tracing::info;

use crate::calendar::{CalendarOptions, OperationalCalendar, build_calendar};
use crate::config::{Granularity, OutputFormat, SpeciesConfig};
use crate::constants::output_filenames;
use crate::deploy::{DeploymentRegistry, read_deployments};
use crate::detect::{DetectionRecord, read_detections};
use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use crate::events::{Event, ExtractorOptions, extract_events};
use crate::output::{
    RunMetadata, SurveyReport, write_calendar, write_events_by_species, write_species_by_station,
    write_survey_json,
};
use crate::survey::{SurveySummary, aggregate};

/// Resolved options for one run, combining CLI flags and configuration.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Independence threshold in minutes.
    pub threshold_minutes: i64,
    /// Count setup and retrieval days as half days.
    pub half_day_effort: bool,
    /// Calendar granularity for the calendar export.
    pub granularity: Granularity,
    /// Output formats to write.
    pub formats: Vec<OutputFormat>,
    /// Directory output files are written to.
    pub output_dir: PathBuf,
    /// Overwrite existing output files.
    pub force: bool,
    /// Write a UTF-8 BOM at the start of CSV exports.
    pub csv_bom: bool,
    /// Abort on the first malformed input row.
    pub strict: bool,
    /// Date format for the deployment table.
    pub date_format: String,
    /// Datetime format for the detection table.
    pub datetime_format: String,
    /// Species aliases and exclusions.
    pub species: SpeciesConfig,
    /// Metadata tag species names come from, recorded for provenance.
    pub species_tag: String,
}

/// Everything derived from the inputs during one run.
#[derive(Debug)]
pub struct Analysis {
    /// Validated deployment registry.
    pub registry: DeploymentRegistry,
    /// Operational calendar.
    pub calendar: OperationalCalendar,
    /// Loaded detection records.
    pub records: Vec<DetectionRecord>,
    /// Extracted independent events.
    pub events: Vec<Event>,
    /// Summary tables.
    pub summary: SurveySummary,
    /// Non-fatal issues collected along the way.
    pub diagnostics: Diagnostics,
}

/// Files written by a survey run.
#[derive(Debug, Default)]
pub struct WrittenOutputs {
    /// Paths of the written files.
    pub paths: Vec<PathBuf>,
}

/// Load the deployment table and build the validated registry.
pub fn load_registry(
    deployments: &Path,
    options: &RunOptions,
    diagnostics: &mut Diagnostics,
) -> Result<DeploymentRegistry> {
    let table = read_deployments(deployments, &options.date_format, options.strict, diagnostics)?;
    info!(
        "Loaded {} deployment window(s) from {}",
        table.windows.len(),
        deployments.display()
    );
    DeploymentRegistry::new(table.stations, table.windows)
}

/// Run the full analysis without writing any outputs.
pub fn analyze(deployments: &Path, detections: &Path, options: &RunOptions) -> Result<Analysis> {
    let mut diagnostics = Diagnostics::new();

    let registry = load_registry(deployments, options, &mut diagnostics)?;
    let calendar = build_calendar(
        &registry,
        CalendarOptions {
            half_day_effort: options.half_day_effort,
        },
    );
    let (start, end) = calendar.span();
    info!(
        "Operational calendar covers {start}..{end} for {} station(s)",
        registry.stations().count()
    );

    let records = read_detections(
        detections,
        &options.datetime_format,
        &options.species,
        options.strict,
        &mut diagnostics,
    )?;
    info!(
        "Loaded {} detection record(s) from {}",
        records.len(),
        detections.display()
    );

    let events = extract_events(
        &records,
        &calendar,
        ExtractorOptions {
            threshold: Duration::minutes(options.threshold_minutes),
        },
        &mut diagnostics,
    );
    info!(
        "Extracted {} independent event(s) at a {} minute threshold",
        events.len(),
        options.threshold_minutes
    );

    let summary = aggregate(&events, &calendar, &registry, &mut diagnostics);

    Ok(Analysis {
        registry,
        calendar,
        records,
        events,
        summary,
        diagnostics,
    })
}

/// Run the full survey and write the configured exports.
pub fn run_survey(
    deployments: &Path,
    detections: &Path,
    options: &RunOptions,
) -> Result<(Analysis, WrittenOutputs)> {
    let analysis = analyze(deployments, detections, options)?;
    let mut outputs = WrittenOutputs::default();

    for format in &options.formats {
        match format {
            OutputFormat::Csv => {
                let path = prepare_output(options, output_filenames::SPECIES_BY_STATION)?;
                write_species_by_station(&path, &analysis.summary, options.csv_bom)?;
                outputs.paths.push(path);

                let path = prepare_output(options, output_filenames::EVENTS_BY_SPECIES)?;
                write_events_by_species(&path, &analysis.summary, options.csv_bom)?;
                outputs.paths.push(path);
            }
            OutputFormat::Json => {
                let path = prepare_output(options, output_filenames::SURVEY_JSON)?;
                let report = SurveyReport {
                    meta: RunMetadata::capture(
                        options.threshold_minutes,
                        options.half_day_effort,
                        &options.species_tag,
                    ),
                    summary: &analysis.summary,
                    diagnostics: &analysis.diagnostics,
                };
                write_survey_json(&path, &report)?;
                outputs.paths.push(path);
            }
        }
    }

    for path in &outputs.paths {
        info!("Wrote {}", path.display());
    }
    Ok((analysis, outputs))
}

/// Build the operational calendar and write the matrix export.
pub fn run_calendar(deployments: &Path, options: &RunOptions) -> Result<PathBuf> {
    let mut diagnostics = Diagnostics::new();
    let registry = load_registry(deployments, options, &mut diagnostics)?;
    let calendar = build_calendar(
        &registry,
        CalendarOptions {
            half_day_effort: options.half_day_effort,
        },
    );

    let path = prepare_output(options, output_filenames::CALENDAR)?;
    write_calendar(&path, &calendar, options.granularity, options.csv_bom)?;
    info!("Wrote {}", path.display());
    Ok(path)
}

fn prepare_output(options: &RunOptions, filename: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(&options.output_dir)?;
    let path = options.output_dir.join(filename);
    if path.exists() && !options.force {
        return Err(Error::OutputExists { path });
    }
    Ok(path)
}
