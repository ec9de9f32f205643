//! Deployment data types.

use chrono::NaiveDate;
use serde::Serialize;

/// A camera-trap station.
///
/// Coordinates are passed through to outputs unchanged; no projection or
/// other spatial processing happens here.
#[derive(Debug, Clone, Serialize)]
pub struct Station {
    /// Case-sensitive station identifier.
    pub id: String,
    /// Optional X coordinate.
    pub x: Option<f64>,
    /// Optional Y coordinate.
    pub y: Option<f64>,
}

/// The date range a camera was installed and expected to be recording
/// at a station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentWindow {
    /// Station identifier.
    pub station: String,
    /// Camera identifier.
    pub camera: String,
    /// Setup date (inclusive).
    pub setup: NaiveDate,
    /// Retrieval date (inclusive); `None` for an ongoing deployment.
    pub retrieval: Option<NaiveDate>,
}

impl DeploymentWindow {
    /// Inclusive end date for calendar purposes.
    ///
    /// Ongoing deployments run through `fallback`, the latest date known
    /// anywhere in the registry, so the calendar axis stays finite.
    pub fn effective_retrieval(&self, fallback: NaiveDate) -> NaiveDate {
        self.retrieval.unwrap_or(fallback)
    }

    /// True if `date` falls within the window (inclusive of both bounds).
    pub fn contains(&self, date: NaiveDate, fallback: NaiveDate) -> bool {
        date >= self.setup && date <= self.effective_retrieval(fallback)
    }

    /// Formatted date range for error messages.
    pub fn range_label(&self) -> String {
        match self.retrieval {
            Some(retrieval) => format!("{}..{}", self.setup, retrieval),
            None => format!("{}..(ongoing)", self.setup),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn window(setup: NaiveDate, retrieval: Option<NaiveDate>) -> DeploymentWindow {
        DeploymentWindow {
            station: "SP01".to_string(),
            camera: "C1".to_string(),
            setup,
            retrieval,
        }
    }

    #[test]
    fn test_contains_inclusive_bounds() {
        let w = window(date(2024, 1, 1), Some(date(2024, 1, 10)));
        let fallback = date(2024, 12, 31);

        assert!(w.contains(date(2024, 1, 1), fallback));
        assert!(w.contains(date(2024, 1, 10), fallback));
        assert!(w.contains(date(2024, 1, 5), fallback));
        assert!(!w.contains(date(2023, 12, 31), fallback));
        assert!(!w.contains(date(2024, 1, 11), fallback));
    }

    #[test]
    fn test_open_window_runs_through_fallback() {
        let w = window(date(2024, 3, 1), None);
        let fallback = date(2024, 6, 30);

        assert!(w.contains(date(2024, 6, 30), fallback));
        assert!(!w.contains(date(2024, 7, 1), fallback));
        assert_eq!(w.effective_retrieval(fallback), fallback);
    }

    #[test]
    fn test_range_label() {
        let closed = window(date(2024, 1, 1), Some(date(2024, 1, 10)));
        assert_eq!(closed.range_label(), "2024-01-01..2024-01-10");

        let open = window(date(2024, 1, 1), None);
        assert_eq!(open.range_label(), "2024-01-01..(ongoing)");
    }
}
