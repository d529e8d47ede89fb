//! The parsed datasets and the per-location aggregation that turns them into
//! [`LocationData`] view models.

use crate::datasets::error::DatasetError;
use crate::datasets::normalizer::{decode_rows, FromRecord, NumericPolicy, Weekly};
use crate::locations::registry::LocationRegistry;
use crate::locations::schedule::latest_schedule_timestamp;
use crate::types::location::Location;
use crate::types::rows::daily::{DailyRow, WeeklyRow};
use crate::types::rows::monthly::MonthlyRow;
use crate::types::rows::yearly::YearlyRow;
use crate::types::view::{
    LocationData, LocationDetails, MonthlyPoint, Overview, RecentPoint, Summary, YearlyPoint,
};
use crate::utils::{max_value, mean, min_value, round2};
use bon::bon;
use chrono::{DateTime, NaiveTime, TimeDelta, Utc};

/// Number of days in the recent series.
pub const RECENT_DAYS: usize = 30;

/// The full, immutable row set of all four datasets plus the locations derived
/// from it.
///
/// Aggregation never mutates the rows, so the same `DashboardData` can serve any
/// number of concurrent [`DashboardData::for_location`] requests.
#[derive(Debug, Clone, Default)]
pub struct DashboardData {
    daily: Vec<DailyRow>,
    weekly: Vec<WeeklyRow>,
    monthly: Vec<MonthlyRow>,
    yearly: Vec<YearlyRow>,
    registry: LocationRegistry,
}

fn decode_dataset<R: FromRecord>(raw: &str, policy: NumericPolicy) -> Result<Vec<R>, DatasetError> {
    decode_rows(raw, policy).map_err(|source| DatasetError::Decode {
        dataset: R::DATASET,
        source,
    })
}

#[bon]
impl DashboardData {
    pub fn new(
        daily: Vec<DailyRow>,
        weekly: Vec<WeeklyRow>,
        monthly: Vec<MonthlyRow>,
        yearly: Vec<YearlyRow>,
    ) -> Self {
        let registry = LocationRegistry::from_daily_rows(&daily);
        Self {
            daily,
            weekly,
            monthly,
            yearly,
            registry,
        }
    }

    /// Decodes the CSV text of all four datasets.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Decode`] naming the first dataset that failed to decode.
    pub fn from_csv(
        daily: &str,
        weekly: &str,
        monthly: &str,
        yearly: &str,
        policy: NumericPolicy,
    ) -> Result<Self, DatasetError> {
        let daily = decode_dataset::<DailyRow>(daily, policy)?;
        let weekly = decode_dataset::<Weekly>(weekly, policy)?
            .into_iter()
            .map(|Weekly(row)| row)
            .collect();
        let monthly = decode_dataset::<MonthlyRow>(monthly, policy)?;
        let yearly = decode_dataset::<YearlyRow>(yearly, policy)?;
        Ok(Self::new(daily, weekly, monthly, yearly))
    }

    /// Locations for a selection list, sorted by state name.
    pub fn locations(&self) -> &[Location] {
        self.registry.locations()
    }

    pub fn registry(&self) -> &LocationRegistry {
        &self.registry
    }

    pub fn daily_rows(&self) -> &[DailyRow] {
        &self.daily
    }

    pub fn weekly_rows(&self) -> &[WeeklyRow] {
        &self.weekly
    }

    pub fn monthly_rows(&self) -> &[MonthlyRow] {
        &self.monthly
    }

    pub fn yearly_rows(&self) -> &[YearlyRow] {
        &self.yearly
    }

    /// Builds the view model for one location.
    ///
    /// An unknown `location_id` resolves to the first location. Missing data never
    /// fails: without daily rows the overview is zero and the recent series is a
    /// synthetic run of [`RECENT_DAYS`] days ending at `now`; without yearly rows
    /// the summary statistics are zero.
    ///
    /// * `.now(DateTime<Utc>)`: Optional. The instant used for the schedule
    ///   timestamp and the fallback series. Defaults to the current time.
    ///
    /// Returns `None` only when the daily dataset contains no locations at all.
    ///
    /// # Example
    ///
    /// ```
    /// use state_weather::{DashboardData, NumericPolicy};
    ///
    /// let daily = "state,date,avg_temp,min_temp,max_temp,avg_wind,min_wind,max_wind,avg_humidity,min_humidity,max_humidity\n\
    ///              Missouri,2024-03-01,10.456,2,18,12,4,20,60,40,80";
    /// let data = DashboardData::from_csv(daily, "", "", "", NumericPolicy::Lenient).unwrap();
    ///
    /// let view = data.for_location("missouri").call().unwrap();
    /// assert_eq!(view.overview.current_temperature, 10.46);
    /// assert_eq!(view.summary.record_start_date, "2024-03-01");
    /// ```
    #[builder(start_fn = for_location)]
    #[doc(hidden)]
    pub fn build_for_location(
        &self,
        #[builder(start_fn)] location_id: &str,
        now: Option<DateTime<Utc>>,
    ) -> Option<LocationData> {
        let now = now.unwrap_or_else(Utc::now);
        let location = self.registry.resolve(location_id)?;
        let state = location.state_name.as_str();

        // `sort_by_key` is stable, so equal keys keep dataset order.
        let mut daily: Vec<&DailyRow> = self.daily.iter().filter(|row| row.state == state).collect();
        daily.sort_by_key(|row| row.date);
        let mut monthly: Vec<&MonthlyRow> =
            self.monthly.iter().filter(|row| row.state == state).collect();
        monthly.sort_by_key(|row| row.month);
        let mut yearly: Vec<&YearlyRow> =
            self.yearly.iter().filter(|row| row.state == state).collect();
        yearly.sort_by_key(|row| row.year);

        let latest = daily.last().copied();

        Some(LocationData {
            location: LocationDetails::from(location),
            overview: overview(latest, &location.timezone, now),
            recent: recent_series(&daily, now),
            monthly: monthly.iter().map(|row| monthly_point(row)).collect(),
            yearly: yearly.iter().map(|row| yearly_point(row)).collect(),
            summary: summary(&daily, &yearly),
            weekly: self
                .weekly
                .iter()
                .filter(|row| row.state == state)
                .cloned()
                .collect(),
        })
    }
}

fn overview(latest: Option<&DailyRow>, timezone: &str, now: DateTime<Utc>) -> Overview {
    let stats = latest.map(|row| row.stats).unwrap_or_default();
    Overview {
        current_temperature: round2(stats.avg_temp),
        current_wind_speed: round2(stats.avg_wind),
        current_humidity: round2(stats.avg_humidity),
        last_updated: latest_schedule_timestamp(timezone, now),
    }
}

/// The last [`RECENT_DAYS`] daily rows, or a synthetic series of that many days
/// ending at `now` when there are none.
fn recent_series(daily: &[&DailyRow], now: DateTime<Utc>) -> Vec<RecentPoint> {
    let start = daily.len().saturating_sub(RECENT_DAYS);
    let recent: Vec<RecentPoint> = daily[start..]
        .iter()
        .map(|row| RecentPoint {
            timestamp: row.date.and_time(NaiveTime::MIN).and_utc(),
            temperature_2m: round2(row.stats.avg_temp),
            wind_speed_10m: round2(row.stats.avg_wind),
            relative_humidity_2m: round2(row.stats.avg_humidity),
            is_forecast: false,
        })
        .collect();
    if !recent.is_empty() {
        return recent;
    }

    let stats = daily.last().map(|row| row.stats).unwrap_or_default();
    (0..RECENT_DAYS)
        .map(|index| {
            let days_back = (RECENT_DAYS - 1 - index) as i64;
            RecentPoint {
                timestamp: now
                    .checked_sub_signed(TimeDelta::days(days_back))
                    .unwrap_or(now),
                temperature_2m: round2(stats.avg_temp),
                wind_speed_10m: round2(stats.avg_wind),
                relative_humidity_2m: round2(stats.avg_humidity),
                is_forecast: false,
            }
        })
        .collect()
}

fn monthly_point(row: &MonthlyRow) -> MonthlyPoint {
    MonthlyPoint {
        year: row.month.year(),
        month: row.month.month(),
        month_label: row.month.label(),
        avg_temperature_2m: round2(row.stats.avg_temp),
        max_temperature_2m: round2(row.stats.max_temp),
        min_temperature_2m: round2(row.stats.min_temp),
        avg_wind_speed_10m: round2(row.stats.avg_wind),
        avg_relative_humidity_2m: round2(row.stats.avg_humidity),
    }
}

fn yearly_point(row: &YearlyRow) -> YearlyPoint {
    YearlyPoint {
        year: row.year.get(),
        avg_temperature_2m: round2(row.stats.avg_temp),
        avg_wind_speed_10m: round2(row.stats.avg_wind),
        avg_relative_humidity_2m: round2(row.stats.avg_humidity),
    }
}

fn summary(daily: &[&DailyRow], yearly: &[&YearlyRow]) -> Summary {
    let column = |pick: fn(&YearlyRow) -> f64| -> Vec<f64> {
        yearly.iter().map(|row| pick(row)).collect()
    };
    let rounded = |value: Option<f64>| value.map(round2).unwrap_or(0.0);
    let record_date = |row: Option<&&DailyRow>| {
        row.map(|row| row.date.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    };

    Summary {
        overall_avg_temperature_2m: rounded(mean(&column(|row| row.stats.avg_temp))),
        overall_max_temperature_2m: rounded(max_value(&column(|row| row.stats.max_temp))),
        overall_min_temperature_2m: rounded(min_value(&column(|row| row.stats.min_temp))),
        overall_avg_wind_speed_10m: rounded(mean(&column(|row| row.stats.avg_wind))),
        overall_avg_relative_humidity_2m: rounded(mean(&column(|row| row.stats.avg_humidity))),
        record_start_date: record_date(daily.first()),
        record_end_date: record_date(daily.last()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::period::{Month, Year};
    use crate::types::rows::measurements::Measurements;
    use chrono::{NaiveDate, TimeZone};

    fn stats(avg_temp: f64, avg_wind: f64, avg_humidity: f64) -> Measurements {
        Measurements {
            avg_temp,
            min_temp: avg_temp - 5.0,
            max_temp: avg_temp + 5.0,
            avg_wind,
            min_wind: 0.0,
            max_wind: avg_wind * 2.0,
            avg_humidity,
            min_humidity: 0.0,
            max_humidity: 100.0,
        }
    }

    fn daily(state: &str, date: NaiveDate, avg_temp: f64) -> DailyRow {
        DailyRow {
            state: state.to_string(),
            date,
            stats: stats(avg_temp, 10.0, 50.0),
        }
    }

    fn monthly(state: &str, year: i32, month: u32, avg_temp: f64) -> MonthlyRow {
        MonthlyRow {
            state: state.to_string(),
            month: Month(year, month),
            stats: stats(avg_temp, 8.0, 60.0),
        }
    }

    fn yearly(state: &str, year: i32, measurements: Measurements) -> YearlyRow {
        YearlyRow {
            state: state.to_string(),
            year: Year(year),
            stats: measurements,
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 20, 30, 0).unwrap()
    }

    fn day(offset: u64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(offset)
    }

    fn sample_data() -> DashboardData {
        // 40 Missouri days in shuffled order, one Ohio day.
        let mut daily_rows: Vec<DailyRow> = (0..40u64)
            .rev()
            .map(|offset| daily("Missouri", day(offset), offset as f64 + 0.004))
            .collect();
        daily_rows.swap(3, 17);
        daily_rows.push(daily("Ohio", day(0), 1.0));

        let weekly_rows = vec![
            daily("Missouri", day(14), 5.0),
            daily("Ohio", day(7), 2.0),
            daily("Missouri", day(7), 4.0),
        ];

        let monthly_rows = vec![
            monthly("Missouri", 2024, 1, 3.0),
            monthly("Missouri", 2023, 12, 2.0),
            monthly("Ohio", 2023, 5, 9.0),
            monthly("Missouri", 2023, 2, 1.0),
            monthly("Missouri", 2024, 2, 4.0),
        ];

        let yearly_rows = vec![
            yearly(
                "Missouri",
                2023,
                Measurements {
                    avg_temp: 12.5,
                    min_temp: -15.333,
                    max_temp: 38.0,
                    avg_wind: 10.0,
                    avg_humidity: 60.0,
                    ..Default::default()
                },
            ),
            yearly(
                "Missouri",
                2022,
                Measurements {
                    avg_temp: 13.0,
                    min_temp: -10.0,
                    max_temp: 40.126,
                    avg_wind: 11.0,
                    avg_humidity: 61.0,
                    ..Default::default()
                },
            ),
            yearly("Ohio", 2022, stats(100.0, 100.0, 100.0)),
        ];

        DashboardData::new(daily_rows, weekly_rows, monthly_rows, yearly_rows)
    }

    #[test]
    fn test_locations_come_from_daily_rows() {
        let data = sample_data();
        let ids: Vec<&str> = data.locations().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["missouri", "ohio"]);
    }

    #[test]
    fn test_overview_uses_latest_daily_row() {
        let view = sample_data().for_location("missouri").now(fixed_now()).call().unwrap();

        assert_eq!(view.location.state_name, "Missouri");
        assert_eq!(view.location.timezone, "America/Chicago");
        assert_eq!(view.overview.current_temperature, 39.0);
        assert_eq!(view.overview.current_wind_speed, 10.0);
        assert_eq!(view.overview.current_humidity, 50.0);
        assert_eq!(view.overview.last_updated, "2024-05-01T12:00:00-06:00");
    }

    #[test]
    fn test_recent_series_is_last_thirty_days_in_order() {
        let view = sample_data().for_location("missouri").now(fixed_now()).call().unwrap();

        assert_eq!(view.recent.len(), RECENT_DAYS);
        assert_eq!(
            view.recent[0].timestamp,
            Utc.with_ymd_and_hms(2024, 1, 11, 0, 0, 0).unwrap()
        );
        assert_eq!(
            view.recent[29].timestamp,
            Utc.with_ymd_and_hms(2024, 2, 9, 0, 0, 0).unwrap()
        );
        assert!(view
            .recent
            .windows(2)
            .all(|pair| pair[0].timestamp < pair[1].timestamp));
        assert_eq!(view.recent[0].temperature_2m, 10.0);
        assert!(view.recent.iter().all(|point| !point.is_forecast));
    }

    #[test]
    fn test_short_history_is_not_padded() {
        let view = sample_data().for_location("ohio").now(fixed_now()).call().unwrap();
        assert_eq!(view.recent.len(), 1);
        assert_eq!(view.recent[0].temperature_2m, 1.0);
    }

    #[test]
    fn test_fallback_series_without_daily_rows() {
        let data = DashboardData::new(
            vec![daily("Texas", day(0), 20.0)],
            vec![],
            vec![monthly("Kansas", 2024, 1, 1.0)],
            vec![],
        );
        // Locations normally come from daily rows; register Kansas without any.
        let data = DashboardData {
            registry: LocationRegistry::from_states(["Kansas", "Texas"]),
            ..data
        };
        let now = fixed_now();
        let view = data.for_location("kansas").now(now).call().unwrap();

        assert_eq!(view.location.state_name, "Kansas");
        assert_eq!(view.recent.len(), RECENT_DAYS);
        assert_eq!(view.recent[RECENT_DAYS - 1].timestamp, now);
        assert_eq!(view.recent[0].timestamp, now - TimeDelta::days(29));
        for pair in view.recent.windows(2) {
            assert_eq!(pair[1].timestamp - pair[0].timestamp, TimeDelta::days(1));
        }
        assert!(view.recent.iter().all(|point| !point.is_forecast
            && point.temperature_2m == 0.0
            && point.wind_speed_10m == 0.0
            && point.relative_humidity_2m == 0.0));

        assert_eq!(view.overview.current_temperature, 0.0);
        assert_eq!(view.overview.last_updated, "2024-05-01T12:00:00-05:00");
        assert_eq!(view.summary.record_start_date, "");
        assert_eq!(view.summary.record_end_date, "");
        assert_eq!(view.monthly.len(), 1);
    }

    #[test]
    fn test_monthly_series_sorted_by_year_then_month() {
        let view = sample_data().for_location("missouri").now(fixed_now()).call().unwrap();
        let keys: Vec<(i32, u32)> = view.monthly.iter().map(|p| (p.year, p.month)).collect();

        assert_eq!(keys, vec![(2023, 2), (2023, 12), (2024, 1), (2024, 2)]);
        assert_eq!(view.monthly[0].month_label, Some("Feb"));
        assert_eq!(view.monthly[0].max_temperature_2m, 6.0);
        assert_eq!(view.monthly[0].min_temperature_2m, -4.0);
        assert_eq!(view.monthly[0].avg_relative_humidity_2m, 60.0);
    }

    #[test]
    fn test_yearly_series_and_summary() {
        let view = sample_data().for_location("missouri").now(fixed_now()).call().unwrap();

        let years: Vec<i32> = view.yearly.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2022, 2023]);
        assert_eq!(view.yearly[0].avg_temperature_2m, 13.0);

        assert_eq!(view.summary.overall_avg_temperature_2m, 12.75);
        assert_eq!(view.summary.overall_max_temperature_2m, 40.13);
        assert_eq!(view.summary.overall_min_temperature_2m, -15.33);
        assert_eq!(view.summary.overall_avg_wind_speed_10m, 10.5);
        assert_eq!(view.summary.overall_avg_relative_humidity_2m, 60.5);
        assert_eq!(view.summary.record_start_date, "2024-01-01");
        assert_eq!(view.summary.record_end_date, "2024-02-09");
    }

    #[test]
    fn test_summary_is_zero_without_yearly_rows() {
        let data = DashboardData::new(vec![daily("Utah", day(3), 7.0)], vec![], vec![], vec![]);
        let view = data.for_location("utah").now(fixed_now()).call().unwrap();

        assert_eq!(view.summary.overall_avg_temperature_2m, 0.0);
        assert_eq!(view.summary.overall_max_temperature_2m, 0.0);
        assert_eq!(view.summary.overall_min_temperature_2m, 0.0);
        assert_eq!(view.summary.record_start_date, "2024-01-04");
        assert!(view.yearly.is_empty());
    }

    #[test]
    fn test_summary_propagates_nan() {
        let mut bad = stats(10.0, 5.0, 50.0);
        bad.max_temp = f64::NAN;
        let data = DashboardData::new(
            vec![daily("Utah", day(0), 7.0)],
            vec![],
            vec![],
            vec![yearly("Utah", 2020, stats(10.0, 5.0, 50.0)), yearly("Utah", 2021, bad)],
        );
        let view = data.for_location("utah").now(fixed_now()).call().unwrap();

        assert!(view.summary.overall_max_temperature_2m.is_nan());
        assert_eq!(view.summary.overall_min_temperature_2m, 5.0);
    }

    #[test]
    fn test_weekly_rows_are_filtered_but_not_sorted() {
        let view = sample_data().for_location("missouri").now(fixed_now()).call().unwrap();
        let dates: Vec<NaiveDate> = view.weekly.iter().map(|row| row.date).collect();
        assert_eq!(dates, vec![day(14), day(7)]);
    }

    #[test]
    fn test_unknown_location_falls_back_to_first() {
        let view = sample_data().for_location("nowhere").now(fixed_now()).call().unwrap();
        assert_eq!(view.location.state_name, "Missouri");
    }

    #[test]
    fn test_no_locations_yields_none() {
        let data = DashboardData::default();
        assert!(data.for_location("missouri").call().is_none());
    }

    #[test]
    fn test_aggregation_is_deterministic() {
        let data = sample_data();
        let first = data.for_location("missouri").now(fixed_now()).call().unwrap();
        let second = data.for_location("missouri").now(fixed_now()).call().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
    }

    #[test]
    fn test_from_csv_reports_failing_dataset() {
        let header = "state,year,avg_temp";
        let yearly = format!("{}\nOhio,soon,1", header);
        let result = DashboardData::from_csv("", "", "", &yearly, NumericPolicy::Lenient);

        match result {
            Err(DatasetError::Decode { dataset, .. }) => {
                assert_eq!(dataset, crate::Dataset::Yearly)
            }
            other => panic!("expected decode error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_json_field_names() {
        let view = sample_data().for_location("missouri").now(fixed_now()).call().unwrap();
        let json: serde_json::Value = serde_json::from_str(&view.to_json().unwrap()).unwrap();

        assert_eq!(json["location"]["state_name"], "Missouri");
        assert_eq!(json["overview"]["last_updated"], "2024-05-01T12:00:00-06:00");
        assert_eq!(json["hourly"][0]["timestamp"], "2024-01-11T00:00:00.000Z");
        assert_eq!(json["hourly"][0]["is_forecast"], false);
        assert_eq!(json["monthly"][0]["month_label"], "Feb");
        assert_eq!(json["summary"]["record_end_date"], "2024-02-09");
        assert_eq!(json["weekly"][0]["date"], "2024-01-15");
        assert_eq!(json["weekly"][0]["avg_temp"], 5.0);
    }
}
