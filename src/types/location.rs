//! Defines the locations (US states) the dashboard can display.

use serde::{Deserialize, Serialize};

/// A selectable location derived from the daily dataset.
///
/// The dataset only carries state names, so the coarse geographic fields are
/// placeholders: coordinates are zero and `city_name` is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Stable identifier, the slug of the state name (e.g. "new-york").
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city_name: String,
    /// The state name exactly as it appears in the dataset.
    pub state_name: String,
    pub country_name: String,
    /// IANA timezone name used for the schedule timestamp.
    pub timezone: String,
}
