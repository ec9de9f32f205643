//! Detection record store and loading.

mod reader;
mod types;

pub use reader::read_detections;
pub use types::DetectionRecord;
