//! Detection data types.

use chrono::NaiveDateTime;

/// A single species detection from one media item.
///
/// Species names come from the upstream tagging tool and are kept verbatim,
/// including unicode, apart from configured aliases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionRecord {
    /// Station identifier.
    pub station: String,
    /// Camera identifier.
    pub camera: String,
    /// Species name.
    pub species: String,
    /// Capture timestamp of the media item.
    pub timestamp: NaiveDateTime,
    /// Optional media identifier for audit trails.
    pub media_id: Option<String>,
}
