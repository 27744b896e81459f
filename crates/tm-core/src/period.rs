//! Day, week and month boundary math.
//!
//! All functions are generic over [`chrono::TimeZone`] so the caller
//! injects the zone: the CLI passes `Local`, tests pass `Utc` or a fixed
//! offset with fixed instants. Boundaries are half-open epoch-second
//! ranges `[start, end)`.

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone};

/// Epoch timestamp of local midnight on `date`.
/// Handles DST ambiguity by picking the earlier time; a DST gap at
/// midnight falls forward to 01:00.
fn midnight_ts<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> i64 {
    let midnight = date.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&midnight) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.timestamp(),
        LocalResult::None => {
            let one_am = date.and_time(NaiveTime::from_hms_opt(1, 0, 0).unwrap());
            tz.from_local_datetime(&one_am)
                .earliest()
                .map_or_else(|| midnight.and_utc().timestamp(), |dt| dt.timestamp())
        }
    }
}

/// The local calendar date containing the given epoch timestamp.
#[must_use]
pub fn local_date<Tz: TimeZone>(tz: &Tz, ts: i64) -> NaiveDate {
    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.with_timezone(tz).date_naive())
        .unwrap_or_default()
}

/// Epoch timestamp of the start of the local day containing `ts`.
#[must_use]
pub fn day_start<Tz: TimeZone>(tz: &Tz, ts: i64) -> i64 {
    midnight_ts(tz, local_date(tz, ts))
}

/// Half-open epoch range of the local day starting on `date`.
#[must_use]
pub fn day_bounds<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> (i64, i64) {
    (
        midnight_ts(tz, date),
        midnight_ts(tz, date + Duration::days(1)),
    )
}

/// Half-open epoch range of the Monday-to-Monday week containing `date`.
#[must_use]
pub fn week_bounds<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> (i64, i64) {
    let monday = week_start(date);
    (
        midnight_ts(tz, monday),
        midnight_ts(tz, monday + Duration::days(7)),
    )
}

/// The Monday of the week containing `date`.
#[must_use]
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Half-open epoch range of the calendar month containing `date`.
#[must_use]
pub fn month_bounds<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> (i64, i64) {
    let first = first_of_month(date);
    (midnight_ts(tz, first), midnight_ts(tz, next_month(first)))
}

/// The first day of the month containing `date`.
#[must_use]
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap()
}

/// The first day of the month after the one containing `date`.
#[must_use]
pub fn next_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap()
}
