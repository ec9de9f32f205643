//! CSV export writers.
//!
//! All exports are UTF-8 with a stable column set and deterministic row
//! order. An optional UTF-8 BOM keeps spreadsheet tools from guessing the
//! encoding.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::calendar::OperationalCalendar;
use crate::config::Granularity;
use crate::constants::{RATE_DECIMAL_PLACES, UTF8_BOM};
use crate::error::{Error, Result};
use crate::survey::SurveySummary;

/// Write the species-by-station table.
///
/// Columns: Station, Species, X, Y, Events, Records, `EffortDays`,
/// `EventsPerDay`. The rate cell is left empty when the effort denominator
/// is zero.
pub fn write_species_by_station(path: &Path, summary: &SurveySummary, bom: bool) -> Result<()> {
    let mut writer = open(path, bom)?;
    species_by_station_rows(&mut writer, summary).map_err(|e| Error::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

fn species_by_station_rows(writer: &mut impl Write, summary: &SurveySummary) -> std::io::Result<()> {
    writeln!(
        writer,
        "Station,Species,X,Y,Events,Records,EffortDays,EventsPerDay"
    )?;
    for row in &summary.species_by_station {
        write!(
            writer,
            "{},{},",
            escape_csv(&row.station),
            escape_csv(&row.species)
        )?;
        if let Some(x) = row.x {
            write!(writer, "{x}")?;
        }
        write!(writer, ",")?;
        if let Some(y) = row.y {
            write!(writer, "{y}")?;
        }
        write!(
            writer,
            ",{},{},{:.1},",
            row.events, row.records, row.effort_days
        )?;
        if let Some(rate) = row.rate {
            write!(writer, "{rate:.decimal$}", decimal = RATE_DECIMAL_PLACES)?;
        }
        writeln!(writer)?;
    }
    writer.flush()
}

/// Write the events-by-species table.
///
/// Columns: Species, Events, Records.
pub fn write_events_by_species(path: &Path, summary: &SurveySummary, bom: bool) -> Result<()> {
    let mut writer = open(path, bom)?;
    events_by_species_rows(&mut writer, summary).map_err(|e| Error::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

fn events_by_species_rows(writer: &mut impl Write, summary: &SurveySummary) -> std::io::Result<()> {
    writeln!(writer, "Species,Events,Records")?;
    for row in &summary.events_by_species {
        writeln!(
            writer,
            "{},{},{}",
            escape_csv(&row.species),
            row.events,
            row.records
        )?;
    }
    writer.flush()
}

/// Write the operational calendar matrix.
///
/// One row per station (or per station and camera at camera granularity),
/// one column per date in the global span, cells holding one-letter status
/// codes.
pub fn write_calendar(
    path: &Path,
    calendar: &OperationalCalendar,
    granularity: Granularity,
    bom: bool,
) -> Result<()> {
    let mut writer = open(path, bom)?;
    calendar_rows(&mut writer, calendar, granularity).map_err(|e| Error::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

fn calendar_rows(
    writer: &mut impl Write,
    calendar: &OperationalCalendar,
    granularity: Granularity,
) -> std::io::Result<()> {
    match granularity {
        Granularity::Station => {
            write!(writer, "Station")?;
            for date in calendar.dates() {
                write!(writer, ",{date}")?;
            }
            writeln!(writer)?;

            for station in calendar.stations() {
                write!(writer, "{}", escape_csv(station))?;
                if let Some(row) = calendar.station_row(station) {
                    for status in row {
                        write!(writer, ",{}", status.code())?;
                    }
                }
                writeln!(writer)?;
            }
        }
        Granularity::Camera => {
            write!(writer, "Station,Camera")?;
            for date in calendar.dates() {
                write!(writer, ",{date}")?;
            }
            writeln!(writer)?;

            for (station, camera) in calendar.cameras() {
                write!(writer, "{},{}", escape_csv(station), escape_csv(camera))?;
                if let Some(row) = calendar.camera_row(station, camera) {
                    for status in row {
                        write!(writer, ",{}", status.code())?;
                    }
                }
                writeln!(writer)?;
            }
        }
    }
    writer.flush()
}

fn open(path: &Path, bom: bool) -> Result<BufWriter<File>> {
    let file = File::create(path).map_err(|e| Error::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);
    if bom {
        writer.write_all(UTF8_BOM).map_err(|e| Error::OutputWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    Ok(writer)
}

/// Escape a value for CSV output.
fn escape_csv(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
