//! Synthesizes the "last updated" display value for a dashboard that refreshes on
//! a fixed 6-hour cadence (00, 06, 12 and 18 local time).

use crate::locations::timezone::offset_minutes_for;
use chrono::{DateTime, TimeDelta, Timelike, Utc};

const SCHEDULE_INTERVAL_HOURS: u32 = 6;

/// The latest 6-hour schedule boundary at or before `now`, in local time of
/// `timezone`, e.g. `2024-05-01T12:00:00-06:00`.
///
/// Local time is `now` shifted by the zone's fixed offset (see
/// [`offset_minutes_for`]); the result is display text and is never parsed back.
pub fn latest_schedule_timestamp(timezone: &str, now: DateTime<Utc>) -> String {
    let offset_minutes = offset_minutes_for(timezone);
    let local = now
        .checked_add_signed(TimeDelta::minutes(i64::from(offset_minutes)))
        .unwrap_or(now)
        .naive_utc();
    let scheduled_hour = local.hour() / SCHEDULE_INTERVAL_HOURS * SCHEDULE_INTERVAL_HOURS;
    format!(
        "{}T{:02}:00:00{}",
        local.format("%Y-%m-%d"),
        scheduled_hour,
        format_offset(offset_minutes)
    )
}

/// Formats an offset as `±HH:MM`. Zero is written as `-00:00`.
pub fn format_offset(offset_minutes: i32) -> String {
    let sign = if offset_minutes <= 0 { '-' } else { '+' };
    let abs_minutes = offset_minutes.unsigned_abs();
    format!("{}{:02}:{:02}", sign, abs_minutes / 60, abs_minutes % 60)
}
