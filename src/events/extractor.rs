//! Collapse temporally close detections into independent events.

use chrono::{Duration, NaiveDateTime};

use crate::calendar::OperationalCalendar;
use crate::constants::DEFAULT_THRESHOLD_MINUTES;
use crate::detect::DetectionRecord;
use crate::diagnostics::Diagnostics;

/// One or more detections of the same species at the same camera collapsed
/// under the time-gap rule: a single estimated animal visit.
#[derive(Debug, Clone)]
pub struct Event {
    /// Station identifier.
    pub station: String,
    /// Camera identifier.
    pub camera: String,
    /// Species name.
    pub species: String,
    /// Timestamp of the earliest contributing detection.
    pub start: NaiveDateTime,
    /// Timestamp of the latest contributing detection.
    pub end: NaiveDateTime,
    /// Number of detections merged into this event.
    pub record_count: usize,
    /// Media identifiers of contributing detections, for audit trails.
    pub media_ids: Vec<String>,
    /// True when a contributing detection has no covering active or
    /// partial operational day for its camera.
    pub out_of_operation: bool,
}

/// Event extraction options.
#[derive(Debug, Clone, Copy)]
pub struct ExtractorOptions {
    /// Maximum gap between consecutive detections of one visit.
    pub threshold: Duration,
}

impl Default for ExtractorOptions {
    fn default() -> Self {
        Self {
            threshold: Duration::minutes(DEFAULT_THRESHOLD_MINUTES),
        }
    }
}

/// Extract independent events from raw detections.
///
/// Detections are sorted internally by (station, camera, species,
/// timestamp, media id), so the result depends only on the record set and
/// the threshold, never on caller order. Consecutive records of one
/// (station, camera, species) merge while the gap between neighbors stays
/// within the threshold; different stations, cameras or species never
/// merge. Detections outside any operational day are kept and flagged,
/// with a diagnostic per record.
pub fn extract_events(
    records: &[DetectionRecord],
    calendar: &OperationalCalendar,
    options: ExtractorOptions,
    diagnostics: &mut Diagnostics,
) -> Vec<Event> {
    let mut sorted: Vec<&DetectionRecord> = records.iter().collect();
    sorted.sort_by(|a, b| {
        (&a.station, &a.camera, &a.species, a.timestamp, &a.media_id)
            .cmp(&(&b.station, &b.camera, &b.species, b.timestamp, &b.media_id))
    });

    let mut events: Vec<Event> = Vec::new();

    for record in sorted {
        let covered = calendar.is_covered(&record.station, &record.camera, record.timestamp.date());
        if !covered {
            diagnostics.record_out_of_window(
                &record.station,
                &record.camera,
                &record.species,
                record.timestamp,
            );
        }

        let merge = events.last().is_some_and(|event| {
            event.station == record.station
                && event.camera == record.camera
                && event.species == record.species
                && record.timestamp.signed_duration_since(event.end) <= options.threshold
        });

        if merge {
            // `merge` implies a last event exists.
            if let Some(event) = events.last_mut() {
                event.end = record.timestamp;
                event.record_count += 1;
                if let Some(media_id) = &record.media_id {
                    event.media_ids.push(media_id.clone());
                }
                event.out_of_operation |= !covered;
            }
        } else {
            events.push(Event {
                station: record.station.clone(),
                camera: record.camera.clone(),
                species: record.species.clone(),
                start: record.timestamp,
                end: record.timestamp,
                record_count: 1,
                media_ids: record.media_id.iter().cloned().collect(),
                out_of_operation: !covered,
            });
        }
    }

    events
}
