//! Aggregate events and the operational calendar into summary tables.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::calendar::OperationalCalendar;
use crate::deploy::DeploymentRegistry;
use crate::diagnostics::Diagnostics;
use crate::events::Event;

/// One row of the species-by-station table.
#[derive(Debug, Clone, Serialize)]
pub struct StationSpeciesRow {
    /// Station identifier.
    pub station: String,
    /// Species name.
    pub species: String,
    /// Station X coordinate, passed through unchanged.
    pub x: Option<f64>,
    /// Station Y coordinate, passed through unchanged.
    pub y: Option<f64>,
    /// Number of independent events.
    pub events: usize,
    /// Number of raw detections behind those events.
    pub records: usize,
    /// Operational-day denominator: active days + 0.5 per partial day.
    pub effort_days: f64,
    /// Events per operational day; `None` when the denominator is zero.
    pub rate: Option<f64>,
}

/// One row of the events-by-species table.
#[derive(Debug, Clone, Serialize)]
pub struct SpeciesRow {
    /// Species name.
    pub species: String,
    /// Number of independent events across all stations.
    pub events: usize,
    /// Number of raw detections behind those events.
    pub records: usize,
}

/// Complete survey summary, rows in deterministic order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SurveySummary {
    /// Rows sorted by (station, species).
    pub species_by_station: Vec<StationSpeciesRow>,
    /// Rows sorted by species.
    pub events_by_species: Vec<SpeciesRow>,
}

/// Aggregate events into the survey summary.
///
/// Aggregation is a fold over maps keyed by (station, species) and by
/// species, so a reordered but identical event set yields identical
/// output. Stations without a single operational day keep a zero
/// denominator and an undefined rate; each such station with events is
/// also recorded as a diagnostic.
pub fn aggregate(
    events: &[Event],
    calendar: &OperationalCalendar,
    registry: &DeploymentRegistry,
    diagnostics: &mut Diagnostics,
) -> SurveySummary {
    let mut per_station: BTreeMap<(String, String), (usize, usize)> = BTreeMap::new();
    let mut per_species: BTreeMap<String, (usize, usize)> = BTreeMap::new();

    for event in events {
        let station_entry = per_station
            .entry((event.station.clone(), event.species.clone()))
            .or_insert((0, 0));
        station_entry.0 += 1;
        station_entry.1 += event.record_count;

        let species_entry = per_species.entry(event.species.clone()).or_insert((0, 0));
        species_entry.0 += 1;
        species_entry.1 += event.record_count;
    }

    let mut station_event_totals: BTreeMap<&str, usize> = BTreeMap::new();
    for ((station, _), (event_count, _)) in &per_station {
        *station_event_totals.entry(station.as_str()).or_insert(0) += event_count;
    }
    for (station, events) in station_event_totals {
        if calendar.station_effort(station) <= 0.0 {
            diagnostics.record_undefined_rate(station, events);
        }
    }

    let species_by_station = per_station
        .into_iter()
        .map(|((station, species), (event_count, record_count))| {
            let effort_days = calendar.station_effort(&station);
            #[allow(clippy::cast_precision_loss)]
            let rate = if effort_days > 0.0 {
                Some(event_count as f64 / effort_days)
            } else {
                None
            };
            let station_info = registry.station(&station);

            StationSpeciesRow {
                x: station_info.and_then(|s| s.x),
                y: station_info.and_then(|s| s.y),
                station,
                species,
                events: event_count,
                records: record_count,
                effort_days,
                rate,
            }
        })
        .collect();

    let events_by_species = per_species
        .into_iter()
        .map(|(species, (event_count, record_count))| SpeciesRow {
            species,
            events: event_count,
            records: record_count,
        })
        .collect();

    SurveySummary {
        species_by_station,
        events_by_species,
    }
}
