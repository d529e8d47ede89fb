use crate::types::rows::measurements::Measurements;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct DailyRow {
    pub state: String,   // state
    pub date: NaiveDate, // date
    #[serde(flatten)]
    pub stats: Measurements,
}

/// Weekly rows share the daily shape; `date` identifies the week.
pub type WeeklyRow = DailyRow;
