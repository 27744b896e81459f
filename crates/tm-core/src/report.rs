//! Report aggregation over timer entries.
//!
//! The store feeds these functions flat entry lists for a period; the
//! aggregation itself is pure so it can be tested with fixed instants.
//! An entry logs against the day its timer started, not against the days
//! its accumulated time happens to cover.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, TimeZone};

use crate::period::local_date;

/// One timer's contribution to a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerEntry {
    pub account_id: i64,
    pub account_name: String,
    pub memo: String,
    /// Banked seconds for this timer.
    pub seconds: i64,
    /// Epoch seconds of the timer's recorded start.
    pub started_at: i64,
}

/// Per-day slice of a weekly report. Days with zero total are omitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayTotal {
    pub date: NaiveDate,
    pub seconds: i64,
    /// Contributing entries, ordered by start timestamp.
    pub entries: Vec<TimerEntry>,
}

/// Weekly totals with a per-day breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekReport {
    /// The Monday this week starts on.
    pub week_start: NaiveDate,
    pub total_seconds: i64,
    pub days: Vec<DayTotal>,
}

/// Per-account slice of a monthly report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountTotal {
    pub account_name: String,
    pub seconds: i64,
    /// Contributing entries, ordered by start timestamp.
    pub entries: Vec<TimerEntry>,
}

/// Aggregates a week's entries into a total and per-day breakdown.
///
/// `entries` must already be restricted to the week starting on
/// `week_start` (the store's range query does that); days without any
/// recorded time are omitted from the breakdown.
#[must_use]
pub fn week_report<Tz: TimeZone>(
    tz: &Tz,
    week_start: NaiveDate,
    entries: Vec<TimerEntry>,
) -> WeekReport {
    let total_seconds = entries.iter().map(|entry| entry.seconds).sum();

    let mut by_day: BTreeMap<NaiveDate, Vec<TimerEntry>> = BTreeMap::new();
    for entry in entries {
        by_day
            .entry(local_date(tz, entry.started_at))
            .or_default()
            .push(entry);
    }

    let mut days = Vec::new();
    for offset in 0..7 {
        let date = week_start + Duration::days(offset);
        let Some(mut entries) = by_day.remove(&date) else {
            continue;
        };
        entries.sort_by_key(|entry| entry.started_at);
        let seconds = entries.iter().map(|entry| entry.seconds).sum::<i64>();
        if seconds == 0 {
            continue;
        }
        days.push(DayTotal {
            date,
            seconds,
            entries,
        });
    }

    WeekReport {
        week_start,
        total_seconds,
        days,
    }
}

/// Groups a period's entries by account, ordered by account name.
#[must_use]
pub fn month_report(entries: Vec<TimerEntry>) -> Vec<AccountTotal> {
    let mut by_account: BTreeMap<String, Vec<TimerEntry>> = BTreeMap::new();
    for entry in entries {
        by_account
            .entry(entry.account_name.clone())
            .or_default()
            .push(entry);
    }

    by_account
        .into_iter()
        .map(|(account_name, mut entries)| {
            entries.sort_by_key(|entry| entry.started_at);
            let seconds = entries.iter().map(|entry| entry.seconds).sum();
            AccountTotal {
                account_name,
                seconds,
                entries,
            }
        })
        .collect()
}
