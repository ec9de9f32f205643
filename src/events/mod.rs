//! Independent event extraction from raw detections.

mod extractor;

pub use extractor::{Event, ExtractorOptions, extract_events};
