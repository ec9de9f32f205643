//! Non-fatal issues collected during a run.
//!
//! Malformed rows, out-of-window detections and undefined rates are
//! recorded here and surfaced in the run report instead of being silently
//! dropped. Structural problems (overlapping deployment windows) abort the
//! run through [`crate::error::Error`] instead.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::warn;

/// A malformed input row skipped during loading.
#[derive(Debug, Clone, Serialize)]
pub struct RowIssue {
    /// Input file the row came from.
    pub path: PathBuf,
    /// 1-based data row number (the header is not counted).
    pub row: u64,
    /// Description of the problem.
    pub message: String,
}

/// A detection timestamped outside any deployment window for its camera.
#[derive(Debug, Clone, Serialize)]
pub struct OutOfWindowIssue {
    /// Station identifier.
    pub station: String,
    /// Camera identifier.
    pub camera: String,
    /// Species name.
    pub species: String,
    /// Detection timestamp.
    pub timestamp: NaiveDateTime,
}

/// A station with detection events but zero operational days.
#[derive(Debug, Clone, Serialize)]
pub struct UndefinedRateIssue {
    /// Station identifier.
    pub station: String,
    /// Number of events reported for the station.
    pub events: usize,
}

/// Collected non-fatal issues for one run.
#[derive(Debug, Default, Serialize)]
pub struct Diagnostics {
    /// Malformed rows skipped during loading.
    pub parse_errors: Vec<RowIssue>,
    /// Detections outside any deployment window.
    pub out_of_window: Vec<OutOfWindowIssue>,
    /// Detections skipped per excluded species.
    pub excluded_species: BTreeMap<String, usize>,
    /// Stations with events but no operational days.
    pub undefined_rates: Vec<UndefinedRateIssue>,
}

impl Diagnostics {
    /// Create an empty diagnostics collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a malformed input row.
    pub fn record_parse_error(&mut self, path: &Path, row: u64, message: impl Into<String>) {
        let message = message.into();
        warn!("row {row} of '{}' is malformed: {message}", path.display());
        self.parse_errors.push(RowIssue {
            path: path.to_path_buf(),
            row,
            message,
        });
    }

    /// Record a detection outside any deployment window for its camera.
    pub fn record_out_of_window(
        &mut self,
        station: &str,
        camera: &str,
        species: &str,
        timestamp: NaiveDateTime,
    ) {
        warn!(
            "detection of '{species}' at {timestamp} is outside any deployment window \
             for camera '{camera}' at station '{station}'"
        );
        self.out_of_window.push(OutOfWindowIssue {
            station: station.to_string(),
            camera: camera.to_string(),
            species: species.to_string(),
            timestamp,
        });
    }

    /// Record a detection skipped because its species is excluded.
    pub fn record_excluded_species(&mut self, species: &str) {
        *self
            .excluded_species
            .entry(species.to_string())
            .or_insert(0) += 1;
    }

    /// Record a station with events but zero operational days.
    pub fn record_undefined_rate(&mut self, station: &str, events: usize) {
        warn!(
            "station '{station}' has {events} event(s) but zero operational days, \
             detection rate is undefined"
        );
        self.undefined_rates.push(UndefinedRateIssue {
            station: station.to_string(),
            events,
        });
    }

    /// True when no issues were recorded.
    pub fn is_clean(&self) -> bool {
        self.parse_errors.is_empty()
            && self.out_of_window.is_empty()
            && self.excluded_species.is_empty()
            && self.undefined_rates.is_empty()
    }

    /// Total number of recorded issues.
    pub fn total(&self) -> usize {
        self.parse_errors.len()
            + self.out_of_window.len()
            + self.excluded_species.values().sum::<usize>()
            + self.undefined_rates.len()
    }

    /// Render a human-readable report of all recorded issues.
    pub fn report(&self) -> String {
        let mut out = String::new();

        if self.is_clean() {
            out.push_str("no issues found\n");
            return out;
        }

        if !self.parse_errors.is_empty() {
            let _ = writeln!(out, "malformed rows: {}", self.parse_errors.len());
            for issue in &self.parse_errors {
                let _ = writeln!(
                    out,
                    "  {} row {}: {}",
                    issue.path.display(),
                    issue.row,
                    issue.message
                );
            }
        }

        if !self.out_of_window.is_empty() {
            let _ = writeln!(
                out,
                "detections outside deployment windows: {}",
                self.out_of_window.len()
            );
            for issue in &self.out_of_window {
                let _ = writeln!(
                    out,
                    "  {}/{} {} at {}",
                    issue.station, issue.camera, issue.species, issue.timestamp
                );
            }
        }

        if !self.excluded_species.is_empty() {
            let _ = writeln!(out, "excluded species:");
            for (species, count) in &self.excluded_species {
                let _ = writeln!(out, "  {species}: {count} detection(s)");
            }
        }

        if !self.undefined_rates.is_empty() {
            let _ = writeln!(out, "stations with undefined detection rates:");
            for issue in &self.undefined_rates {
                let _ = writeln!(
                    out,
                    "  {}: {} event(s), zero operational days",
                    issue.station, issue.events
                );
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_new_diagnostics_is_clean() {
        let diag = Diagnostics::new();
        assert!(diag.is_clean());
        assert_eq!(diag.total(), 0);
        assert_eq!(diag.report(), "no issues found\n");
    }

    #[test]
    fn test_recorded_issues_counted() {
        let mut diag = Diagnostics::new();
        diag.record_parse_error(Path::new("deploy.csv"), 3, "bad date");
        diag.record_excluded_species("Randonneur");
        diag.record_excluded_species("Randonneur");
        diag.record_undefined_rate("SP01", 2);

        assert!(!diag.is_clean());
        assert_eq!(diag.total(), 4);
        assert_eq!(diag.excluded_species.get("Randonneur"), Some(&2));
    }

    #[test]
    fn test_report_names_offenders() {
        let mut diag = Diagnostics::new();
        let ts = NaiveDate::from_ymd_opt(2024, 1, 15)
            .and_then(|d| d.and_hms_opt(8, 30, 0))
            .expect("valid timestamp");
        diag.record_out_of_window("SP01", "C1", "Renard roux", ts);

        let report = diag.report();
        assert!(report.contains("SP01/C1 Renard roux"));
        assert!(report.contains("2024-01-15"));
    }
}
