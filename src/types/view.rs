//! The view model handed to the presentation layer for one location.
//!
//! Field names follow what the dashboard components read, so the JSON produced by
//! [`LocationData::to_json`] can be consumed as-is.

use crate::types::location::Location;
use crate::types::rows::daily::WeeklyRow;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

/// Everything the dashboard shows for a single location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationData {
    pub location: LocationDetails,
    pub overview: Overview,
    /// The most recent daily values (daily granularity despite the wire name).
    #[serde(rename = "hourly")]
    pub recent: Vec<RecentPoint>,
    pub monthly: Vec<MonthlyPoint>,
    pub yearly: Vec<YearlyPoint>,
    pub summary: Summary,
    /// Weekly rows for the location, passed through in dataset order.
    pub weekly: Vec<WeeklyRow>,
}

impl LocationData {
    /// Renders the view model as pretty-printed JSON. Non-finite numbers become `null`.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationDetails {
    pub city_name: String,
    pub state_name: String,
    pub country_name: String,
    pub timezone: String,
}

impl From<&Location> for LocationDetails {
    fn from(location: &Location) -> Self {
        Self {
            city_name: location.city_name.clone(),
            state_name: location.state_name.clone(),
            country_name: location.country_name.clone(),
            timezone: location.timezone.clone(),
        }
    }
}

/// "Current conditions", taken from the latest daily row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub current_temperature: f64,
    pub current_wind_speed: f64,
    pub current_humidity: f64,
    /// Latest 6-hour schedule boundary, e.g. `2024-05-01T12:00:00-06:00`.
    pub last_updated: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentPoint {
    #[serde(serialize_with = "serialize_millis")]
    pub timestamp: DateTime<Utc>,
    pub temperature_2m: f64,
    pub wind_speed_10m: f64,
    pub relative_humidity_2m: f64,
    pub is_forecast: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyPoint {
    pub year: i32,
    pub month: u32,
    /// "Jan" .. "Dec"; absent when the dataset holds an out-of-range month.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month_label: Option<&'static str>,
    pub avg_temperature_2m: f64,
    pub max_temperature_2m: f64,
    pub min_temperature_2m: f64,
    pub avg_wind_speed_10m: f64,
    pub avg_relative_humidity_2m: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyPoint {
    pub year: i32,
    pub avg_temperature_2m: f64,
    pub avg_wind_speed_10m: f64,
    pub avg_relative_humidity_2m: f64,
}

/// Whole-record statistics. Numbers come from the yearly series, dates from the
/// daily rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub overall_avg_temperature_2m: f64,
    pub overall_max_temperature_2m: f64,
    pub overall_min_temperature_2m: f64,
    pub overall_avg_wind_speed_10m: f64,
    pub overall_avg_relative_humidity_2m: f64,
    /// First daily record date (`YYYY-MM-DD`), empty without daily rows.
    pub record_start_date: String,
    /// Last daily record date (`YYYY-MM-DD`), empty without daily rows.
    pub record_end_date: String,
}

fn serialize_millis<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
}
