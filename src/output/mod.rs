//! Output writers for survey exports.

mod csv;
mod json;

pub use csv::{write_calendar, write_events_by_species, write_species_by_station};
pub use json::{RunMetadata, SurveyReport, write_survey_json};
