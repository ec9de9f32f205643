//! Operational calendar construction from the deployment registry.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::calendar::{DayStatus, OperationalCalendar};
use crate::deploy::{DeploymentRegistry, DeploymentWindow};

/// Calendar construction options.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalendarOptions {
    /// Count setup and retrieval days as half days (effort 0.5). Off by
    /// default: boundary days are treated as fully active.
    pub half_day_effort: bool,
}

/// Build the operational calendar for a validated registry.
///
/// Produces one status row per station and one per (station, camera), each
/// covering the full global span. Overlap validation has already happened
/// in [`DeploymentRegistry::new`], so windows of one camera can only touch
/// on a shared boundary day.
pub fn build_calendar(
    registry: &DeploymentRegistry,
    options: CalendarOptions,
) -> OperationalCalendar {
    let (start, end) = registry.span();

    let mut camera_days = BTreeMap::new();
    for (station, camera) in registry.cameras() {
        let windows: Vec<&DeploymentWindow> = registry
            .windows()
            .iter()
            .filter(|w| w.station == station && w.camera == camera)
            .collect();
        let row = build_row(&windows, start, end, options);
        camera_days.insert((station, camera), row);
    }

    let mut station_days = BTreeMap::new();
    for station in registry.stations() {
        let windows: Vec<&DeploymentWindow> =
            registry.station_windows(&station.id).collect();
        let row = build_row(&windows, start, end, options);
        station_days.insert(station.id.clone(), row);
    }

    OperationalCalendar::new(start, end, station_days, camera_days)
}

/// Build one status row over `[start, end]` from the unit's windows.
///
/// The unit is a single camera, or a whole station (where the union of all
/// camera windows applies: a station day is active if any camera is).
fn build_row(
    windows: &[&DeploymentWindow],
    start: NaiveDate,
    end: NaiveDate,
    options: CalendarOptions,
) -> Vec<DayStatus> {
    let fallback = end;
    let unit_first = windows.iter().map(|w| w.setup).min().unwrap_or(start);
    let unit_last = windows
        .iter()
        .map(|w| w.effective_retrieval(fallback))
        .max()
        .unwrap_or(start);

    let mut row = Vec::new();
    let mut date = start;
    while date <= end {
        let status = if date < unit_first || date > unit_last {
            DayStatus::NoData
        } else {
            day_status(windows, date, fallback, options)
        };
        row.push(status);
        let Some(next) = date.succ_opt() else { break };
        date = next;
    }
    row
}

/// Classify one date against the unit's windows.
///
/// With the half-day convention off, any covering window makes the day
/// active. With it on, a day interior to a window is active; a day that is
/// only a setup boundary is partial-first, only a retrieval boundary
/// partial-last. Two half-coverages (a retrieval meeting a setup, or a
/// single-day window next to another boundary) add up to a full day.
fn day_status(
    windows: &[&DeploymentWindow],
    date: NaiveDate,
    fallback: NaiveDate,
    options: CalendarOptions,
) -> DayStatus {
    if !options.half_day_effort {
        return if windows.iter().any(|w| w.contains(date, fallback)) {
            DayStatus::Active
        } else {
            DayStatus::Inactive
        };
    }

    let covering = windows.iter().filter(|w| w.contains(date, fallback));
    let mut interior = false;
    let mut halves = 0usize;
    let mut setup_half = false;
    for window in covering {
        if window.setup == date {
            // Includes single-day windows (setup == retrieval == date).
            halves += 1;
            setup_half = true;
        } else if window.retrieval == Some(date) {
            halves += 1;
        } else {
            // Open-ended windows never produce a retrieval boundary.
            interior = true;
        }
    }

    if interior {
        return DayStatus::Active;
    }
    match halves {
        0 => DayStatus::Inactive,
        1 if setup_half => DayStatus::PartialFirst,
        1 => DayStatus::PartialLast,
        _ => DayStatus::Active,
    }
}
