//! Configuration type definitions.

use crate::constants::{
    DEFAULT_DATE_FORMAT, DEFAULT_DATETIME_FORMAT, DEFAULT_SPECIES_TAG, DEFAULT_THRESHOLD_MINUTES,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default analysis settings.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Input table settings.
    #[serde(default)]
    pub input: InputConfig,

    /// Species normalization settings.
    #[serde(default)]
    pub species: SpeciesConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Default analysis settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Independence threshold between detections, in minutes.
    pub threshold_minutes: i64,

    /// Count setup and retrieval days as half effort days.
    pub half_day_effort: bool,

    /// Calendar granularity.
    pub granularity: Granularity,

    /// Output formats.
    pub formats: Vec<OutputFormat>,

    /// Abort on the first malformed input row instead of collecting it
    /// as a diagnostic.
    pub strict: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            threshold_minutes: DEFAULT_THRESHOLD_MINUTES,
            half_day_effort: false,
            granularity: Granularity::Station,
            formats: vec![OutputFormat::Csv],
            strict: false,
        }
    }
}

/// Input table settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Date format for deployment setup/retrieval columns.
    pub date_format: String,

    /// Datetime format for the detection timestamp column.
    pub datetime_format: String,

    /// Metadata tag the upstream tagging tool writes species names to.
    /// Recorded in the JSON report for provenance.
    pub species_tag: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            datetime_format: DEFAULT_DATETIME_FORMAT.to_string(),
            species_tag: DEFAULT_SPECIES_TAG.to_string(),
        }
    }
}

/// Species normalization settings.
///
/// Aliases rename species at load time (e.g. a tagging shorthand to the
/// canonical survey name). Excluded species (typically non-wildlife
/// categories such as hikers) are skipped with a diagnostic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeciesConfig {
    /// Species renames applied at load time.
    pub aliases: HashMap<String, String>,

    /// Species excluded from analysis.
    pub exclude: Vec<String>,
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Write a UTF-8 BOM at the start of CSV exports for spreadsheet tools.
    pub csv_bom: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { csv_bom: true }
    }
}

/// Calendar granularity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One calendar row per station.
    #[default]
    Station,
    /// One calendar row per station and camera.
    Camera,
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Station => write!(f, "station"),
            Self::Camera => write!(f, "camera"),
        }
    }
}

impl std::str::FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "station" => Ok(Self::Station),
            "camera" => Ok(Self::Camera),
            other => Err(format!("unknown granularity: {other}")),
        }
    }
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tabular CSV exports.
    Csv,
    /// JSON survey report with a metadata envelope.
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}
