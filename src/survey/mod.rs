//! Survey aggregation: per-species and per-station summary tables.

mod aggregator;

pub use aggregator::{SpeciesRow, StationSpeciesRow, SurveySummary, aggregate};
