//! Deployment registry: the ground truth for when each camera was
//! expected to be running at each station.

use crate::deploy::{DeploymentWindow, Station};
use crate::error::{Error, Result};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Validated, immutable set of stations and deployment windows for one run.
#[derive(Debug, Clone)]
pub struct DeploymentRegistry {
    stations: BTreeMap<String, Station>,
    windows: Vec<DeploymentWindow>,
}

impl DeploymentRegistry {
    /// Build a registry from loaded stations and windows.
    ///
    /// Windows are sorted by (station, camera, setup) and checked for
    /// same-camera overlap, which corrupts the calendar and aborts the run.
    /// A retrieval date equal to the next setup date for the same camera is
    /// legal (same-day redeployment); any wider intersection is not.
    pub fn new(stations: Vec<Station>, mut windows: Vec<DeploymentWindow>) -> Result<Self> {
        if windows.is_empty() {
            return Err(Error::NoDeployments);
        }

        windows.sort_by(|a, b| {
            (&a.station, &a.camera, a.setup, a.retrieval)
                .cmp(&(&b.station, &b.camera, b.setup, b.retrieval))
        });
        check_overlaps(&windows)?;

        let mut station_map: BTreeMap<String, Station> = stations
            .into_iter()
            .map(|station| (station.id.clone(), station))
            .collect();
        // Every window's station gets an entry, even without a coordinate row.
        for window in &windows {
            station_map
                .entry(window.station.clone())
                .or_insert_with(|| Station {
                    id: window.station.clone(),
                    x: None,
                    y: None,
                });
        }

        Ok(Self {
            stations: station_map,
            windows,
        })
    }

    /// All deployment windows, sorted by (station, camera, setup).
    pub fn windows(&self) -> &[DeploymentWindow] {
        &self.windows
    }

    /// All stations, in identifier order.
    pub fn stations(&self) -> impl Iterator<Item = &Station> {
        self.stations.values()
    }

    /// Look up a station by identifier.
    pub fn station(&self, id: &str) -> Option<&Station> {
        self.stations.get(id)
    }

    /// Windows belonging to one station.
    pub fn station_windows<'a>(
        &'a self,
        station: &'a str,
    ) -> impl Iterator<Item = &'a DeploymentWindow> {
        self.windows.iter().filter(move |w| w.station == station)
    }

    /// Unique (station, camera) pairs, in sorted order.
    pub fn cameras(&self) -> Vec<(String, String)> {
        let mut keys: Vec<(String, String)> = self
            .windows
            .iter()
            .map(|w| (w.station.clone(), w.camera.clone()))
            .collect();
        keys.dedup();
        keys
    }

    /// Latest date known anywhere: the end of the calendar axis and the
    /// effective retrieval for ongoing deployments.
    pub fn latest_known_date(&self) -> NaiveDate {
        self.windows
            .iter()
            .map(|w| w.retrieval.map_or(w.setup, |r| r.max(w.setup)))
            .max()
            .unwrap_or_default()
    }

    /// Global calendar span `[earliest setup, latest retrieval]` across all
    /// stations, so all stations share one calendar axis.
    pub fn span(&self) -> (NaiveDate, NaiveDate) {
        let start = self
            .windows
            .iter()
            .map(|w| w.setup)
            .min()
            .unwrap_or_default();
        (start, self.latest_known_date())
    }
}

/// Reject overlapping windows for the same camera.
///
/// Expects windows sorted by (station, camera, setup). Open-ended windows
/// conflict with anything later for the same camera.
fn check_overlaps(windows: &[DeploymentWindow]) -> Result<()> {
    for pair in windows.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if prev.station != next.station || prev.camera != next.camera {
            continue;
        }

        let conflict = match prev.retrieval {
            // Shared boundary day (retrieval == next setup) is a same-day swap.
            Some(retrieval) => next.setup < retrieval,
            None => true,
        };
        if conflict {
            return Err(Error::DeploymentOverlap {
                station: prev.station.clone(),
                camera: prev.camera.clone(),
                first: prev.range_label(),
                second: next.range_label(),
            });
        }
    }
    Ok(())
}
