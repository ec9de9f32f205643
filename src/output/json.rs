//! JSON survey report writer.
//!
//! Wraps the survey summary and run diagnostics in a metadata envelope so
//! downstream tools can trace which tool, host and settings produced a
//! report.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};
use crate::survey::SurveySummary;

/// Run metadata recorded in the report envelope.
#[derive(Debug, Clone, Serialize)]
pub struct RunMetadata {
    /// Tool name.
    pub tool: String,
    /// Tool version.
    pub version: String,
    /// Host the report was generated on.
    pub hostname: String,
    /// Generation timestamp.
    pub generated_at: DateTime<Utc>,
    /// Independence threshold in minutes.
    pub threshold_minutes: i64,
    /// Whether the half-day convention was applied.
    pub half_day_effort: bool,
    /// Metadata tag species names were read from upstream.
    pub species_tag: String,
}

impl RunMetadata {
    /// Capture metadata for the current run.
    pub fn capture(threshold_minutes: i64, half_day_effort: bool, species_tag: &str) -> Self {
        let hostname = hostname::get()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "unknown".to_string());

        Self {
            tool: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            hostname,
            generated_at: Utc::now(),
            threshold_minutes,
            half_day_effort,
            species_tag: species_tag.to_string(),
        }
    }
}

/// Complete JSON survey report.
#[derive(Debug, Serialize)]
pub struct SurveyReport<'a> {
    /// Run metadata envelope.
    pub meta: RunMetadata,
    /// Summary tables.
    pub summary: &'a SurveySummary,
    /// Non-fatal issues collected during the run.
    pub diagnostics: &'a Diagnostics,
}

/// Write the survey report as pretty-printed JSON.
pub fn write_survey_json(path: &Path, report: &SurveyReport<'_>) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, report).map_err(|e| Error::JsonWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
