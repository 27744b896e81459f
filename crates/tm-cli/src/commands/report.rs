//! The `tm report` command: week, month and account views.
//!
//! The store supplies flat entry lists for a half-open period; the
//! aggregation lives in `tm-core` and the formatting here, so both are
//! testable with fixed instants. All totals render as hours-and-tenths
//! at the configured billing granularity.

use std::fmt::Write;

use anyhow::{Context, Result, bail};
use chrono::{Datelike, Duration, Local, NaiveDate};
use tm_core::{
    AccountTotal, WeekReport, first_of_month, format_hours_tenths, local_date, month_bounds,
    month_report, next_month, week_bounds, week_report, week_start,
};
use tm_db::Ledger;

/// Daily breakdown for the week containing `date` (default: today).
pub fn week(ledger: &Ledger, round_up: i64, date: Option<NaiveDate>) -> Result<()> {
    let anchor = date.unwrap_or_else(|| Local::now().date_naive());
    let monday = week_start(anchor);
    let (start, end) = week_bounds(&Local, anchor);

    let entries = ledger.entries_in_range(None, start, end)?;
    let report = week_report(&Local, monday, entries);
    print!("{}", format_week(&report, round_up));
    Ok(())
}

/// Per-account totals for one month (default: the current month).
pub fn month(ledger: &Ledger, round_up: i64, month: Option<&str>) -> Result<()> {
    let first = match month {
        Some(month) => parse_month(month)?,
        None => first_of_month(Local::now().date_naive()),
    };
    let (start, end) = month_bounds(&Local, first);

    let entries = ledger.entries_in_range(None, start, end)?;
    let accounts = month_report(entries);
    print!("{}", format_month(first, &accounts, round_up));
    Ok(())
}

/// Month-by-month history for one account. Defaults to the span of the
/// account's recorded timers.
pub fn account(
    ledger: &Ledger,
    round_up: i64,
    name: &str,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<()> {
    let Some(account) = ledger.account_by_name(name)? else {
        bail!("no account named '{name}'");
    };

    let recorded = ledger.account_recorded_range(account.id)?;
    let from = match from {
        Some(month) => parse_month(month)?,
        None => match recorded {
            Some((min, _)) => first_of_month(local_date(&Local, min)),
            None => {
                print!("{}", format_account_history(name, &[], round_up));
                return Ok(());
            }
        },
    };
    let to = match to {
        Some(month) => parse_month(month)?,
        None => match recorded {
            Some((_, max)) => first_of_month(local_date(&Local, max)),
            None => from,
        },
    };
    if to < from {
        bail!("--to month precedes --from month");
    }

    let mut months = Vec::new();
    let mut cursor = from;
    while cursor <= to {
        let (start, end) = month_bounds(&Local, cursor);
        let seconds = ledger.sum_durations(Some(account.id), Some(start), Some(end))?;
        if seconds > 0 {
            months.push((cursor, seconds));
        }
        cursor = next_month(cursor);
    }

    print!("{}", format_account_history(name, &months, round_up));
    Ok(())
}

/// Parses a YYYY-MM month into its first day.
fn parse_month(month: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d")
        .with_context(|| format!("invalid month '{month}', expected YYYY-MM"))
}

fn format_week(report: &WeekReport, round_up: i64) -> String {
    let mut output = String::new();

    let week_end = report.week_start + Duration::days(6);
    writeln!(output, "WEEK {} .. {}", report.week_start, week_end).unwrap();
    writeln!(output).unwrap();

    if report.days.is_empty() {
        writeln!(output, "No time recorded this week.").unwrap();
        return output;
    }

    for day in &report.days {
        writeln!(
            output,
            "{} {}  {}",
            day.date.weekday(),
            day.date,
            format_hours_tenths(day.seconds, round_up)
        )
        .unwrap();
        for entry in &day.entries {
            let memo = if entry.memo.is_empty() {
                String::new()
            } else {
                format!(" - {}", entry.memo)
            };
            writeln!(
                output,
                "    {:>6}  {}{memo}",
                format_hours_tenths(entry.seconds, round_up),
                entry.account_name
            )
            .unwrap();
        }
    }

    writeln!(output).unwrap();
    writeln!(
        output,
        "Total: {}",
        format_hours_tenths(report.total_seconds, round_up)
    )
    .unwrap();

    output
}

fn format_month(first: NaiveDate, accounts: &[AccountTotal], round_up: i64) -> String {
    let mut output = String::new();

    writeln!(output, "MONTH {}", first.format("%Y-%m")).unwrap();
    writeln!(output).unwrap();

    if accounts.is_empty() {
        writeln!(output, "No time recorded this month.").unwrap();
        return output;
    }

    let mut total = 0;
    for account in accounts {
        total += account.seconds;
        writeln!(
            output,
            "{:>6}  {}",
            format_hours_tenths(account.seconds, round_up),
            account.account_name
        )
        .unwrap();
    }

    writeln!(output).unwrap();
    writeln!(output, "Total: {}", format_hours_tenths(total, round_up)).unwrap();

    output
}

fn format_account_history(name: &str, months: &[(NaiveDate, i64)], round_up: i64) -> String {
    let mut output = String::new();

    writeln!(output, "ACCOUNT {name}").unwrap();
    writeln!(output).unwrap();

    if months.is_empty() {
        writeln!(output, "No time recorded for this account.").unwrap();
        return output;
    }

    let mut total = 0;
    for (month, seconds) in months {
        total += seconds;
        writeln!(
            output,
            "{}  {}",
            month.format("%Y-%m"),
            format_hours_tenths(*seconds, round_up)
        )
        .unwrap();
    }

    writeln!(output).unwrap();
    writeln!(output, "Total: {}", format_hours_tenths(total, round_up)).unwrap();

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tm_core::TimerEntry;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(account_name: &str, seconds: i64, started_at: i64) -> TimerEntry {
        TimerEntry {
            account_id: 1,
            account_name: account_name.to_string(),
            memo: String::new(),
            seconds,
            started_at,
        }
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2025-01").unwrap(), date(2025, 1, 1));
        assert!(parse_month("2025").is_err());
        assert!(parse_month("2025-13").is_err());
    }

    #[test]
    fn test_format_week_daily_breakdown() {
        // Mon 2025-01-27 09:00 UTC and Wed 2025-01-29 14:00 UTC.
        let entries = vec![
            entry("Work", 3600, 1_737_968_400),
            entry("Work", 7200, 1_738_159_200),
        ];
        let report = week_report(&Utc, date(2025, 1, 27), entries);
        let output = format_week(&report, 6);

        assert!(output.contains("WEEK 2025-01-27 .. 2025-02-02"));
        assert!(output.contains("Mon 2025-01-27  1.0h"));
        assert!(output.contains("Wed 2025-01-29  2.0h"));
        assert!(output.contains("Total: 3.0h"));
    }

    #[test]
    fn test_format_empty_week() {
        let report = week_report(&Utc, date(2025, 1, 27), Vec::new());
        let output = format_week(&report, 6);
        assert!(output.contains("No time recorded this week."));
    }

    #[test]
    fn test_format_month_per_account_totals() {
        let entries = vec![
            entry("Writing", 1800, 1_736_067_600),
            entry("Admin", 600, 1_736_672_400),
            entry("Writing", 1200, 1_737_104_400),
        ];
        let accounts = month_report(entries);
        let output = format_month(date(2025, 1, 1), &accounts, 6);

        assert!(output.contains("MONTH 2025-01"));
        // 600s -> 10min -> 2 six-minute ticks -> 0.2h
        assert!(output.contains("0.2h  Admin"));
        // 3000s -> 50min -> 0.9h (ceil of 50/6 = 9 ticks)
        assert!(output.contains("0.9h  Writing"));
    }

    #[test]
    fn test_format_account_history_totals_months() {
        let months = vec![(date(2025, 1, 1), 3600), (date(2025, 3, 1), 1800)];
        let output = format_account_history("Work", &months, 6);

        assert!(output.contains("ACCOUNT Work"));
        assert!(output.contains("2025-01  1.0h"));
        assert!(output.contains("2025-03  0.5h"));
        assert!(output.contains("Total: 1.5h"));
    }

    #[test]
    fn test_account_history_spans_recorded_range_and_skips_empty_months() {
        let mut ledger = Ledger::open_in_memory().unwrap();
        let account = ledger.create_account("Work", 100).unwrap();

        // 2025-01-05 and 2025-03-10, nothing in February.
        for (seconds, started_at) in [(3600, 1_736_067_600), (1800, 1_741_600_800)] {
            let timer = ledger.create_timer(account.id, "", started_at).unwrap();
            let mut seeded = ledger.get_timer(timer.id).unwrap();
            seeded.accumulated_seconds = seconds;
            ledger.update_timer(&seeded).unwrap();
        }

        let recorded = ledger.account_recorded_range(account.id).unwrap().unwrap();
        let from = first_of_month(local_date(&Utc, recorded.0));
        let to = first_of_month(local_date(&Utc, recorded.1));
        assert_eq!(from, date(2025, 1, 1));
        assert_eq!(to, date(2025, 3, 1));

        let mut months = Vec::new();
        let mut cursor = from;
        while cursor <= to {
            let (start, end) = month_bounds(&Utc, cursor);
            let seconds = ledger
                .sum_durations(Some(account.id), Some(start), Some(end))
                .unwrap();
            if seconds > 0 {
                months.push((cursor, seconds));
            }
            cursor = next_month(cursor);
        }

        assert_eq!(months, vec![(date(2025, 1, 1), 3600), (date(2025, 3, 1), 1800)]);
    }
}
