//! Operational calendar: day-by-day camera activity per station.

mod builder;

pub use builder::{CalendarOptions, build_calendar};

use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::constants::{PARTIAL_DAY_EFFORT, status_codes};

/// Activity status of one station or camera on one calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DayStatus {
    /// At least one deployment window covers the whole day.
    Active,
    /// Between two deployment windows, no camera running.
    Inactive,
    /// Before the first deployment or after the last retrieval.
    NoData,
    /// Setup day under the half-day convention.
    PartialFirst,
    /// Retrieval day under the half-day convention.
    PartialLast,
}

impl DayStatus {
    /// Effort contributed by a day with this status.
    pub fn effort(self) -> f64 {
        match self {
            Self::Active => 1.0,
            Self::PartialFirst | Self::PartialLast => PARTIAL_DAY_EFFORT,
            Self::Inactive | Self::NoData => 0.0,
        }
    }

    /// True when a camera could have recorded a detection on this day.
    pub fn is_operational(self) -> bool {
        matches!(self, Self::Active | Self::PartialFirst | Self::PartialLast)
    }

    /// One-letter code used in the calendar matrix export.
    pub fn code(self) -> &'static str {
        match self {
            Self::Active => status_codes::ACTIVE,
            Self::Inactive => status_codes::INACTIVE,
            Self::NoData => status_codes::NO_DATA,
            Self::PartialFirst => status_codes::PARTIAL_FIRST,
            Self::PartialLast => status_codes::PARTIAL_LAST,
        }
    }
}

/// Day-indexed activity matrix, one row per station and one per
/// (station, camera), covering the full global span so all stations share
/// the same calendar axis. Built once per run, never mutated afterwards.
#[derive(Debug, Clone)]
pub struct OperationalCalendar {
    start: NaiveDate,
    end: NaiveDate,
    station_days: BTreeMap<String, Vec<DayStatus>>,
    camera_days: BTreeMap<(String, String), Vec<DayStatus>>,
}

impl OperationalCalendar {
    pub(crate) fn new(
        start: NaiveDate,
        end: NaiveDate,
        station_days: BTreeMap<String, Vec<DayStatus>>,
        camera_days: BTreeMap<(String, String), Vec<DayStatus>>,
    ) -> Self {
        Self {
            start,
            end,
            station_days,
            camera_days,
        }
    }

    /// Global span `[start, end]`, both inclusive.
    pub fn span(&self) -> (NaiveDate, NaiveDate) {
        (self.start, self.end)
    }

    /// Number of days in the span.
    pub fn num_days(&self) -> usize {
        usize::try_from(
            self.end
                .signed_duration_since(self.start)
                .num_days()
                .saturating_add(1),
        )
        .unwrap_or(0)
    }

    /// All dates in the span, in order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..self.num_days() as u64).filter_map(|offset| self.start.checked_add_days(Days::new(offset)))
    }

    /// Station identifiers with a calendar row, in sorted order.
    pub fn stations(&self) -> impl Iterator<Item = &str> {
        self.station_days.keys().map(String::as_str)
    }

    /// (station, camera) pairs with a calendar row, in sorted order.
    pub fn cameras(&self) -> impl Iterator<Item = (&str, &str)> {
        self.camera_days
            .keys()
            .map(|(station, camera)| (station.as_str(), camera.as_str()))
    }

    /// Status of a station on a date, if both are known.
    pub fn station_status(&self, station: &str, date: NaiveDate) -> Option<DayStatus> {
        let index = self.date_index(date)?;
        self.station_days.get(station)?.get(index).copied()
    }

    /// Status of a camera on a date, if both are known.
    pub fn camera_status(&self, station: &str, camera: &str, date: NaiveDate) -> Option<DayStatus> {
        let index = self.date_index(date)?;
        self.camera_days
            .get(&(station.to_string(), camera.to_string()))?
            .get(index)
            .copied()
    }

    /// True when the camera has an active or partial day covering `date`.
    ///
    /// Unknown stations, cameras or out-of-span dates are not covered.
    pub fn is_covered(&self, station: &str, camera: &str, date: NaiveDate) -> bool {
        self.camera_status(station, camera, date)
            .is_some_and(DayStatus::is_operational)
    }

    /// Effort denominator for a station: active days plus half of each
    /// partial day. Zero for stations without a calendar row.
    pub fn station_effort(&self, station: &str) -> f64 {
        self.station_days
            .get(station)
            .map_or(0.0, |days| days.iter().map(|status| status.effort()).sum())
    }

    /// Full status row for a station.
    pub fn station_row(&self, station: &str) -> Option<&[DayStatus]> {
        self.station_days.get(station).map(Vec::as_slice)
    }

    /// Full status row for a camera.
    pub fn camera_row(&self, station: &str, camera: &str) -> Option<&[DayStatus]> {
        self.camera_days
            .get(&(station.to_string(), camera.to_string()))
            .map(Vec::as_slice)
    }

    fn date_index(&self, date: NaiveDate) -> Option<usize> {
        if date < self.start || date > self.end {
            return None;
        }
        usize::try_from(date.signed_duration_since(self.start).num_days()).ok()
    }
}
