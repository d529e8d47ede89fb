//! Converts [`RawRecord`]s into the typed rows of each dataset.

use crate::datasets::decoder::{decode_csv, RawRecord};
use crate::datasets::error::DecodeError;
use crate::types::dataset::Dataset;
use crate::types::period::{Month, Year};
use crate::types::rows::daily::DailyRow;
use crate::types::rows::measurements::Measurements;
use crate::types::rows::monthly::MonthlyRow;
use crate::types::rows::yearly::YearlyRow;
use chrono::NaiveDate;
use log::warn;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// How measurement values that are not numbers are treated.
///
/// Time keys (`date`, `year`, `month`) are always validated regardless of policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericPolicy {
    /// Unparseable or empty values become `NaN` and propagate into aggregates.
    #[default]
    Lenient,
    /// Any unparseable, empty or non-finite value fails decoding.
    Strict,
}

impl FromStr for NumericPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(NumericPolicy::Lenient),
            "strict" => Ok(NumericPolicy::Strict),
            other => Err(format!("unknown numeric policy '{}'", other)),
        }
    }
}

impl fmt::Display for NumericPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericPolicy::Lenient => write!(f, "lenient"),
            NumericPolicy::Strict => write!(f, "strict"),
        }
    }
}

/// A row type that can be built from one record of its dataset.
pub trait FromRecord: Sized {
    const DATASET: Dataset;

    fn from_record(record: &RawRecord, policy: NumericPolicy) -> Result<Self, DecodeError>;
}

/// Decodes the CSV text of a dataset into typed rows.
pub fn decode_rows<R: FromRecord>(raw: &str, policy: NumericPolicy) -> Result<Vec<R>, DecodeError> {
    let mut schema_checked = false;
    decode_csv(raw, |record| {
        if !schema_checked {
            schema_checked = true;
            let missing: Vec<&str> = R::DATASET
                .schema_column_names()
                .into_iter()
                .filter(|column| !record.contains(column))
                .collect();
            if !missing.is_empty() {
                warn!(
                    "{} dataset header is missing columns {:?}; they will read as empty",
                    R::DATASET,
                    missing
                );
            }
        }
        R::from_record(&record, policy)
    })
}

fn invalid(record: &RawRecord, column: &'static str) -> DecodeError {
    DecodeError::InvalidField {
        line: record.line(),
        column,
        value: record.get(column).to_string(),
    }
}

fn measurement(
    record: &RawRecord,
    column: &'static str,
    policy: NumericPolicy,
) -> Result<f64, DecodeError> {
    match (record.get(column).parse::<f64>(), policy) {
        (Ok(value), NumericPolicy::Lenient) => Ok(value),
        (Ok(value), NumericPolicy::Strict) if value.is_finite() => Ok(value),
        (_, NumericPolicy::Lenient) => Ok(f64::NAN),
        (_, NumericPolicy::Strict) => Err(invalid(record, column)),
    }
}

fn measurements(record: &RawRecord, policy: NumericPolicy) -> Result<Measurements, DecodeError> {
    Ok(Measurements {
        avg_temp: measurement(record, "avg_temp", policy)?,
        min_temp: measurement(record, "min_temp", policy)?,
        max_temp: measurement(record, "max_temp", policy)?,
        avg_wind: measurement(record, "avg_wind", policy)?,
        min_wind: measurement(record, "min_wind", policy)?,
        max_wind: measurement(record, "max_wind", policy)?,
        avg_humidity: measurement(record, "avg_humidity", policy)?,
        min_humidity: measurement(record, "min_humidity", policy)?,
        max_humidity: measurement(record, "max_humidity", policy)?,
    })
}

fn date_key(record: &RawRecord) -> Result<NaiveDate, DecodeError> {
    NaiveDate::parse_from_str(record.get("date"), "%Y-%m-%d").map_err(|_| invalid(record, "date"))
}

/// Integral key column; accepts `2023` as well as `2023.0`.
fn integer_key<T: TryFrom<i64>>(record: &RawRecord, column: &'static str) -> Result<T, DecodeError> {
    record
        .get(column)
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && value.fract() == 0.0)
        .and_then(|value| T::try_from(value as i64).ok())
        .ok_or_else(|| invalid(record, column))
}

impl FromRecord for DailyRow {
    const DATASET: Dataset = Dataset::Daily;

    fn from_record(record: &RawRecord, policy: NumericPolicy) -> Result<Self, DecodeError> {
        Ok(DailyRow {
            state: record.get("state").to_string(),
            date: date_key(record)?,
            stats: measurements(record, policy)?,
        })
    }
}

impl FromRecord for MonthlyRow {
    const DATASET: Dataset = Dataset::Monthly;

    fn from_record(record: &RawRecord, policy: NumericPolicy) -> Result<Self, DecodeError> {
        Ok(MonthlyRow {
            state: record.get("state").to_string(),
            month: Month(integer_key(record, "year")?, integer_key(record, "month")?),
            stats: measurements(record, policy)?,
        })
    }
}

impl FromRecord for YearlyRow {
    const DATASET: Dataset = Dataset::Yearly;

    fn from_record(record: &RawRecord, policy: NumericPolicy) -> Result<Self, DecodeError> {
        Ok(YearlyRow {
            state: record.get("state").to_string(),
            year: Year(integer_key(record, "year")?),
            stats: measurements(record, policy)?,
        })
    }
}

/// Weekly rows have the daily shape, so they decode through this wrapper to pick
/// up the weekly dataset's schema.
pub(crate) struct Weekly(pub DailyRow);

impl FromRecord for Weekly {
    const DATASET: Dataset = Dataset::Weekly;

    fn from_record(record: &RawRecord, policy: NumericPolicy) -> Result<Self, DecodeError> {
        DailyRow::from_record(record, policy).map(Weekly)
    }
}
