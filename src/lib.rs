mod config;
mod dashboard;
mod dashboard_data;
mod datasets;
mod error;
mod locations;
mod types;
mod utils;

pub use dashboard::{load_dashboard, shared, WeatherDashboard};
pub use dashboard_data::{DashboardData, RECENT_DAYS};
pub use error::DashboardError;

pub use config::{ConfigError, DashboardConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

pub use datasets::decoder::{decode_csv, decode_records, RawRecord};
pub use datasets::error::{DatasetError, DecodeError};
pub use datasets::loader::DatasetLoader;
pub use datasets::normalizer::{decode_rows, FromRecord, NumericPolicy};

pub use locations::registry::{slugify, LocationRegistry};
pub use locations::schedule::{format_offset, latest_schedule_timestamp};
pub use locations::timezone::{KnownTimeZone, DEFAULT_TIMEZONE};

pub use types::dataset::Dataset;
pub use types::location::Location;
pub use types::period::{Month, Year};
pub use types::rows::daily::{DailyRow, WeeklyRow};
pub use types::rows::measurements::Measurements;
pub use types::rows::monthly::MonthlyRow;
pub use types::rows::yearly::YearlyRow;
pub use types::view::*;

pub use utils::round2;
