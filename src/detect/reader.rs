//! Detection table parsing.
//!
//! Reads the detection CSV (`Station, Camera, Species, DateTimeOriginal`,
//! optional `Media`) with a configurable datetime format. Species aliases
//! and exclusions from the configuration are applied at load time.

use std::path::Path;

use chrono::NaiveDateTime;

use crate::config::SpeciesConfig;
use crate::constants::detection_columns;
use crate::detect::DetectionRecord;
use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};

/// Read a detection table.
///
/// Excluded species are skipped with a diagnostic; malformed rows are
/// collected as diagnostics and skipped unless `strict` is set.
pub fn read_detections(
    path: &Path,
    datetime_format: &str,
    species_config: &SpeciesConfig,
    strict: bool,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<DetectionRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| Error::TableRead {
            path: path.to_path_buf(),
            source: e,
        })?;

    let headers = reader
        .headers()
        .map_err(|e| Error::TableRead {
            path: path.to_path_buf(),
            source: e,
        })?
        .clone();
    let station_col = require_column(&headers, detection_columns::STATION, path)?;
    let camera_col = require_column(&headers, detection_columns::CAMERA, path)?;
    let species_col = require_column(&headers, detection_columns::SPECIES, path)?;
    let timestamp_col = require_column(&headers, detection_columns::TIMESTAMP, path)?;
    let media_col = headers.iter().position(|h| h == detection_columns::MEDIA);

    let mut records = Vec::new();

    for (index, result) in reader.records().enumerate() {
        let row = index as u64 + 1;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                fail_row(path, row, e.to_string(), strict, diagnostics)?;
                continue;
            }
        };

        let station = record.get(station_col).unwrap_or_default();
        let camera = record.get(camera_col).unwrap_or_default();
        let species_raw = record.get(species_col).unwrap_or_default();
        if station.is_empty() || camera.is_empty() || species_raw.is_empty() {
            fail_row(
                path,
                row,
                "empty station, camera or species field",
                strict,
                diagnostics,
            )?;
            continue;
        }

        let timestamp_field = record.get(timestamp_col).unwrap_or_default();
        let timestamp = match NaiveDateTime::parse_from_str(timestamp_field, datetime_format) {
            Ok(timestamp) => timestamp,
            Err(e) => {
                fail_row(
                    path,
                    row,
                    format!("invalid timestamp '{timestamp_field}': {e}"),
                    strict,
                    diagnostics,
                )?;
                continue;
            }
        };

        let species = species_config
            .aliases
            .get(species_raw)
            .map_or(species_raw, String::as_str);
        if species_config.exclude.iter().any(|s| s == species) {
            diagnostics.record_excluded_species(species);
            continue;
        }

        let media_id = media_col
            .and_then(|col| record.get(col))
            .filter(|field| !field.is_empty())
            .map(ToString::to_string);

        records.push(DetectionRecord {
            station: station.to_string(),
            camera: camera.to_string(),
            species: species.to_string(),
            timestamp,
            media_id,
        });
    }

    Ok(records)
}

fn require_column(headers: &csv::StringRecord, name: &str, path: &Path) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| Error::MissingColumn {
            path: path.to_path_buf(),
            column: name.to_string(),
        })
}

fn fail_row(
    path: &Path,
    row: u64,
    message: impl Into<String>,
    strict: bool,
    diagnostics: &mut Diagnostics,
) -> Result<()> {
    let message = message.into();
    if strict {
        return Err(Error::RowParse {
            path: path.to_path_buf(),
            row,
            message,
        });
    }
    diagnostics.record_parse_error(path, row, message);
    Ok(())
}
