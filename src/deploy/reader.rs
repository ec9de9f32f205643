//! Deployment table parsing.
//!
//! Reads the deployment CSV (`Station, Camera, Debut, Fin`, optional
//! `X`/`Y` coordinates) with a configurable date format. Malformed rows are
//! collected as diagnostics and skipped; in strict mode the first malformed
//! row aborts the run.

use std::path::Path;

use chrono::NaiveDate;

use crate::constants::deployment_columns;
use crate::deploy::{DeploymentWindow, Station};
use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result};

/// Parsed contents of a deployment table.
#[derive(Debug, Default)]
pub struct DeploymentTable {
    /// Stations with any coordinates found on their rows.
    pub stations: Vec<Station>,
    /// Deployment windows in file order.
    pub windows: Vec<DeploymentWindow>,
}

/// Read a deployment table.
///
/// An empty `Fin` field marks an ongoing deployment. Rows with missing
/// identifiers, unparseable dates or a retrieval before the setup are
/// recorded as diagnostics and skipped unless `strict` is set.
pub fn read_deployments(
    path: &Path,
    date_format: &str,
    strict: bool,
    diagnostics: &mut Diagnostics,
) -> Result<DeploymentTable> {
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
    let station_col = require_column(&headers, deployment_columns::STATION, path)?;
    let camera_col = require_column(&headers, deployment_columns::CAMERA, path)?;
    let setup_col = require_column(&headers, deployment_columns::SETUP, path)?;
    let retrieval_col = require_column(&headers, deployment_columns::RETRIEVAL, path)?;
    let x_col = find_column(&headers, deployment_columns::X);
    let y_col = find_column(&headers, deployment_columns::Y);

    let mut table = DeploymentTable::default();

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
        if station.is_empty() || camera.is_empty() {
            fail_row(
                path,
                row,
                "empty station or camera identifier",
                strict,
                diagnostics,
            )?;
            continue;
        }

        let setup_field = record.get(setup_col).unwrap_or_default();
        let setup = match NaiveDate::parse_from_str(setup_field, date_format) {
            Ok(date) => date,
            Err(e) => {
                fail_row(
                    path,
                    row,
                    format!("invalid setup date '{setup_field}': {e}"),
                    strict,
                    diagnostics,
                )?;
                continue;
            }
        };

        let retrieval_field = record.get(retrieval_col).unwrap_or_default();
        let retrieval = if retrieval_field.is_empty() {
            None
        } else {
            match NaiveDate::parse_from_str(retrieval_field, date_format) {
                Ok(date) => Some(date),
                Err(e) => {
                    fail_row(
                        path,
                        row,
                        format!("invalid retrieval date '{retrieval_field}': {e}"),
                        strict,
                        diagnostics,
                    )?;
                    continue;
                }
            }
        };

        if let Some(retrieval) = retrieval
            && retrieval < setup
        {
            fail_row(
                path,
                row,
                format!("retrieval {retrieval} precedes setup {setup}"),
                strict,
                diagnostics,
            )?;
            continue;
        }

        if let Some(station_entry) = read_coordinates(&record, station, x_col, y_col) {
            // First row with coordinates wins for a station.
            if !table.stations.iter().any(|s| s.id == station) {
                table.stations.push(station_entry);
            }
        }

        table.windows.push(DeploymentWindow {
            station: station.to_string(),
            camera: camera.to_string(),
            setup,
            retrieval,
        });
    }

    Ok(table)
}

fn read_coordinates(
    record: &csv::StringRecord,
    station: &str,
    x_col: Option<usize>,
    y_col: Option<usize>,
) -> Option<Station> {
    let x = x_col
        .and_then(|col| record.get(col))
        .and_then(|field| field.parse::<f64>().ok());
    let y = y_col
        .and_then(|col| record.get(col))
        .and_then(|field| field.parse::<f64>().ok());

    if x.is_none() && y.is_none() {
        return None;
    }
    Some(Station {
        id: station.to_string(),
        x,
        y,
    })
}

fn find_column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

fn require_column(headers: &csv::StringRecord, name: &str, path: &Path) -> Result<usize> {
    find_column(headers, name).ok_or_else(|| Error::MissingColumn {
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_DATE_FORMAT;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_table(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_read_simple_table() {
        let file = write_table(
            "Station,Camera,Debut,Fin\n\
             SP01,C1,2024/01/01,2024/01/10\n\
             SP01,C1,2024/02/01,\n",
        );

        let mut diag = Diagnostics::new();
        let table =
            read_deployments(file.path(), DEFAULT_DATE_FORMAT, false, &mut diag).unwrap();

        assert_eq!(table.windows.len(), 2);
        assert_eq!(table.windows[0].station, "SP01");
        assert_eq!(
            table.windows[0].retrieval,
            NaiveDate::from_ymd_opt(2024, 1, 10)
        );
        assert!(table.windows[1].retrieval.is_none());
        assert!(diag.is_clean());
    }

    #[test]
    fn test_read_coordinates() {
        let file = write_table(
            "Station,Camera,Debut,Fin,X,Y\n\
             SP01,C1,2024/01/01,2024/01/10,912345.0,6423456.0\n",
        );

        let mut diag = Diagnostics::new();
        let table =
            read_deployments(file.path(), DEFAULT_DATE_FORMAT, false, &mut diag).unwrap();

        assert_eq!(table.stations.len(), 1);
        assert_eq!(table.stations[0].x, Some(912_345.0));
        assert_eq!(table.stations[0].y, Some(6_423_456.0));
    }

    #[test]
    fn test_malformed_row_collected_not_fatal() {
        let file = write_table(
            "Station,Camera,Debut,Fin\n\
             SP01,C1,01-2024-01,2024/01/10\n\
             SP01,C1,2024/02/01,2024/02/10\n",
        );

        let mut diag = Diagnostics::new();
        let table =
            read_deployments(file.path(), DEFAULT_DATE_FORMAT, false, &mut diag).unwrap();

        assert_eq!(table.windows.len(), 1);
        assert_eq!(diag.parse_errors.len(), 1);
        assert_eq!(diag.parse_errors[0].row, 1);
    }

    #[test]
    fn test_malformed_row_fatal_in_strict_mode() {
        let file = write_table(
            "Station,Camera,Debut,Fin\n\
             SP01,C1,01-2024-01,2024/01/10\n",
        );

        let mut diag = Diagnostics::new();
        let result = read_deployments(file.path(), DEFAULT_DATE_FORMAT, true, &mut diag);
        assert!(matches!(result, Err(Error::RowParse { row: 1, .. })));
    }

    #[test]
    fn test_reversed_window_rejected() {
        let file = write_table(
            "Station,Camera,Debut,Fin\n\
             SP01,C1,2024/01/10,2024/01/01\n",
        );

        let mut diag = Diagnostics::new();
        let table =
            read_deployments(file.path(), DEFAULT_DATE_FORMAT, false, &mut diag).unwrap();

        assert!(table.windows.is_empty());
        assert_eq!(diag.parse_errors.len(), 1);
        assert!(diag.parse_errors[0].message.contains("precedes setup"));
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let file = write_table("Station,Camera,Debut\nSP01,C1,2024/01/01\n");

        let mut diag = Diagnostics::new();
        let result = read_deployments(file.path(), DEFAULT_DATE_FORMAT, false, &mut diag);
        assert!(matches!(result, Err(Error::MissingColumn { .. })));
    }

    #[test]
    fn test_custom_date_format() {
        let file = write_table(
            "Station,Camera,Debut,Fin\n\
             SP01,C1,01/02/2024,10/02/2024\n",
        );

        let mut diag = Diagnostics::new();
        let table = read_deployments(file.path(), "%d/%m/%Y", false, &mut diag).unwrap();

        assert_eq!(
            table.windows[0].setup,
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
        );
    }
}
