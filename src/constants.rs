//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "trapstat";

/// Default independence threshold between detections, in minutes.
///
/// Two detections of the same species at the same camera closer together
/// than this are counted as a single visit.
pub const DEFAULT_THRESHOLD_MINUTES: i64 = 30;

/// Default date format for deployment setup/retrieval columns.
pub const DEFAULT_DATE_FORMAT: &str = "%Y/%m/%d";

/// Default datetime format for the detection timestamp column.
pub const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Default metadata tag the upstream tagging tool writes species names to.
pub const DEFAULT_SPECIES_TAG: &str = "HierarchicalSubject";

/// Deployment table column names.
pub mod deployment_columns {
    /// Station identifier column.
    pub const STATION: &str = "Station";
    /// Camera identifier column.
    pub const CAMERA: &str = "Camera";
    /// Setup date column.
    pub const SETUP: &str = "Debut";
    /// Retrieval date column (empty for ongoing deployments).
    pub const RETRIEVAL: &str = "Fin";
    /// Optional X coordinate column.
    pub const X: &str = "X";
    /// Optional Y coordinate column.
    pub const Y: &str = "Y";
}

/// Detection table column names.
pub mod detection_columns {
    /// Station identifier column.
    pub const STATION: &str = "Station";
    /// Camera identifier column.
    pub const CAMERA: &str = "Camera";
    /// Species name column.
    pub const SPECIES: &str = "Species";
    /// Timestamp column.
    pub const TIMESTAMP: &str = "DateTimeOriginal";
    /// Optional media identifier column.
    pub const MEDIA: &str = "Media";
}

/// Output file names.
pub mod output_filenames {
    /// Species-by-station export.
    pub const SPECIES_BY_STATION: &str = "species_by_station.csv";
    /// Events-by-species export.
    pub const EVENTS_BY_SPECIES: &str = "events_by_species.csv";
    /// Operational calendar matrix export.
    pub const CALENDAR: &str = "operational_calendar.csv";
    /// JSON survey report.
    pub const SURVEY_JSON: &str = "survey_report.json";
}

/// One-letter status codes used in the calendar matrix export.
pub mod status_codes {
    /// Camera active the whole day.
    pub const ACTIVE: &str = "A";
    /// Known gap between deployments.
    pub const INACTIVE: &str = "I";
    /// Outside any deployment for the station.
    pub const NO_DATA: &str = "-";
    /// Setup day under the half-day convention.
    pub const PARTIAL_FIRST: &str = "S";
    /// Retrieval day under the half-day convention.
    pub const PARTIAL_LAST: &str = "R";
}

/// Effort contributed by a partial day under the half-day convention.
pub const PARTIAL_DAY_EFFORT: f64 = 0.5;

/// Decimal places for effort and rate formatting in CSV output.
pub const RATE_DECIMAL_PLACES: usize = 4;

/// UTF-8 Byte Order Mark for Excel compatibility in CSV files.
pub const UTF8_BOM: &[u8; 3] = b"\xEF\xBB\xBF";
