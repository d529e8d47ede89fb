//! Defines the four pre-aggregated datasets the dashboard is built from, along with
//! where each one lives relative to the configured base location and which columns
//! its CSV header is expected to carry.

use std::fmt;

/// One of the fixed granularities of pre-aggregated per-state weather statistics.
///
/// Every dataset is a comma-separated text resource with a header row. Columns are
/// matched by name, so reordering is tolerated but renaming is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    /// One row per state per calendar day.
    Daily,
    /// One row per state per week, keyed by the week's date.
    Weekly,
    /// One row per state per (year, month).
    Monthly,
    /// One row per state per year.
    Yearly,
}

const MEASUREMENT_COLUMNS: [&str; 9] = [
    "avg_temp",
    "min_temp",
    "max_temp",
    "avg_wind",
    "min_wind",
    "max_wind",
    "avg_humidity",
    "min_humidity",
    "max_humidity",
];

impl Dataset {
    /// All datasets, in the order they are fetched.
    pub const ALL: [Dataset; 4] = [
        Dataset::Daily,
        Dataset::Weekly,
        Dataset::Monthly,
        Dataset::Yearly,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Dataset::Daily => "daily",
            Dataset::Weekly => "weekly",
            Dataset::Monthly => "monthly",
            Dataset::Yearly => "yearly",
        }
    }

    /// Path of the dataset relative to the base location.
    pub fn relative_path(&self) -> &'static str {
        match self {
            Dataset::Daily => "gold/daily_state_weather.csv",
            Dataset::Weekly => "gold/weekly_state_weather.csv",
            Dataset::Monthly => "gold/monthly_state_weather.csv",
            Dataset::Yearly => "gold/yearly_state_weather.csv",
        }
    }

    /// The full URL of the dataset below `base_url` (which must not end in `/`).
    pub fn url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url, self.relative_path())
    }

    /// Column names the dataset's header is expected to contain.
    pub fn schema_column_names(&self) -> Vec<&'static str> {
        let keys: &[&'static str] = match self {
            Dataset::Daily | Dataset::Weekly => &["state", "date"],
            Dataset::Monthly => &["state", "year", "month"],
            Dataset::Yearly => &["state", "year"],
        };
        keys.iter().chain(MEASUREMENT_COLUMNS.iter()).copied().collect()
    }
}

/// Formats a `Dataset` using its lowercase name.
///
/// # Examples
///
/// ```
/// use state_weather::Dataset;
///
/// assert_eq!(Dataset::Monthly.to_string(), "monthly");
/// ```
impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
