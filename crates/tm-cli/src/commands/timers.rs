//! Timer commands: `tm add-timer` and `tm timers`.
//!
//! The listing is also where start/pause positions come from: a
//! position is the 1-based row number in the active listing at the
//! moment the command runs, resolved to a timer id before anything
//! else happens.

use std::fmt::Write;

use anyhow::{Result, bail};
use chrono::{Local, TimeZone, Utc};
use tm_core::{TimerStatus, format_hms, local_date};
use tm_db::{Ledger, StatusFilter, TimerRow};

/// Creates a paused timer, resolving (or creating) the account by name.
pub fn add(ledger: &mut Ledger, account_name: &str, memo: &str) -> Result<()> {
    let now = Utc::now().timestamp();
    let account = ledger.resolve_or_create_account(account_name, now)?;
    let timer = ledger.create_timer(account.id, memo, now)?;
    tracing::debug!(id = timer.id, account = account.id, "timer created");
    println!("Added timer on '{}'", account.name);
    Ok(())
}

/// Lists timers with their positions and elapsed time.
pub fn list(ledger: &Ledger, all: bool) -> Result<()> {
    let filter = if all {
        StatusFilter::All
    } else {
        StatusFilter::active()
    };
    let rows = ledger.list_timers(&filter)?;
    let now = Utc::now().timestamp();
    print!("{}", format_timers(&Local, now, &rows));
    Ok(())
}

/// Resolves a 1-based position in the active listing to a timer id.
///
/// Positions are only meaningful for the listing the user just saw, so
/// this re-reads the active listing and indexes into it.
pub fn resolve_position(ledger: &Ledger, position: usize) -> Result<i64> {
    let rows = ledger.list_timers(&StatusFilter::active())?;
    let Some(row) = position.checked_sub(1).and_then(|idx| rows.get(idx)) else {
        bail!(
            "no timer at position {position} (there are {} active timers)",
            rows.len()
        );
    };
    Ok(row.timer.id)
}

/// Format timers for human-readable output.
///
/// Positions are only assigned to active rows, so the numbers printed
/// here always agree with what [`resolve_position`] resolves, even when
/// archived timers are interleaved in an `--all` listing.
fn format_timers<Tz: TimeZone>(tz: &Tz, now: i64, rows: &[TimerRow]) -> String {
    let mut output = String::new();

    if rows.is_empty() {
        writeln!(output, "No timers. Add one with 'tm add-timer <account>'.").unwrap();
        return output;
    }

    writeln!(
        output,
        "{:<4}  {:<8}  {:<20}  {:<20}  {:>8}  Date",
        "Pos", "Status", "Account", "Memo", "Elapsed"
    )
    .unwrap();
    let mut position = 0;
    for row in rows {
        let marker = match row.timer.status {
            TimerStatus::Running => "running",
            TimerStatus::Paused => "paused",
            TimerStatus::Inactive => "archived",
        };
        let pos = if row.timer.status == TimerStatus::Inactive {
            "-".to_string()
        } else {
            position += 1;
            position.to_string()
        };
        let date = row
            .timer
            .started_at
            .map(|ts| local_date(tz, ts).to_string())
            .unwrap_or_default();
        writeln!(
            output,
            "{:<4}  {:<8}  {:<20}  {:<20}  {:>8}  {}",
            pos,
            marker,
            truncate(&row.account_name, 20),
            truncate(&row.timer.memo, 20),
            format_hms(row.timer.elapsed(now)),
            date
        )
        .unwrap();
    }

    output
}

/// Truncate by characters, not bytes, to avoid panics on multi-byte UTF-8.
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let kept: String = text.chars().take(width - 3).collect();
        format!("{kept}...")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tm_core::Timer;

    fn row(status: TimerStatus, seconds: i64, started_at: Option<i64>) -> TimerRow {
        TimerRow {
            timer: Timer {
                id: 1,
                account_id: 1,
                memo: "emails".to_string(),
                status,
                accumulated_seconds: seconds,
                started_at,
            },
            account_name: "Work".to_string(),
        }
    }

    #[test]
    fn test_format_empty_listing_hints_at_add() {
        let output = format_timers(&Utc, 0, &[]);
        assert!(output.contains("tm add-timer"));
    }

    #[test]
    fn test_format_paused_timer_shows_banked_time() {
        let rows = vec![row(TimerStatus::Paused, 600, Some(1_737_968_400))];
        let output = format_timers(&Utc, 1_737_970_000, &rows);
        assert!(output.contains("paused"));
        assert!(output.contains("10m"));
        assert!(output.contains("2025-01-27"));
    }

    #[test]
    fn test_format_running_timer_includes_open_interval() {
        let rows = vec![row(TimerStatus::Running, 60, Some(1000))];
        // 60 banked + 40 open = 1m40s
        let output = format_timers(&Utc, 1040, &rows);
        assert!(output.contains("running"));
        assert!(output.contains("1m40s"));
    }

    #[test]
    fn test_resolve_position_indexes_the_active_listing() {
        let mut ledger = Ledger::open_in_memory().unwrap();
        let account = ledger.create_account("Work", 100).unwrap();
        let first = ledger.create_timer(account.id, "a", 100).unwrap();
        let second = ledger.create_timer(account.id, "b", 100).unwrap();

        assert_eq!(resolve_position(&ledger, 1).unwrap(), first.id);
        assert_eq!(resolve_position(&ledger, 2).unwrap(), second.id);
        assert!(resolve_position(&ledger, 3).is_err());
        assert!(resolve_position(&ledger, 0).is_err());
    }

    #[test]
    fn test_all_listing_positions_match_active_resolution() {
        let mut ledger = Ledger::open_in_memory().unwrap();
        let account = ledger.create_account("Work", 100).unwrap();
        let first = ledger.create_timer(account.id, "old", 100).unwrap();
        let second = ledger.create_timer(account.id, "current", 100).unwrap();

        let mut archived = ledger.get_timer(first.id).unwrap();
        archived.status = TimerStatus::Inactive;
        ledger.update_timer(&archived).unwrap();

        let rows = ledger.list_timers(&StatusFilter::All).unwrap();
        let output = format_timers(&Utc, 200, &rows);

        // The archived row carries no position; the active row is
        // numbered 1, agreeing with resolve_position.
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[1].starts_with('-'));
        assert!(lines[1].contains("archived"));
        assert!(lines[2].starts_with('1'));
        assert!(lines[2].contains("current"));
        assert_eq!(resolve_position(&ledger, 1).unwrap(), second.id);
    }

    #[test]
    fn test_resolve_position_skips_archived_timers() {
        let mut ledger = Ledger::open_in_memory().unwrap();
        let account = ledger.create_account("Work", 100).unwrap();
        let first = ledger.create_timer(account.id, "a", 100).unwrap();
        let second = ledger.create_timer(account.id, "b", 100).unwrap();

        let mut archived = ledger.get_timer(first.id).unwrap();
        archived.status = TimerStatus::Inactive;
        ledger.update_timer(&archived).unwrap();

        // Position 1 now refers to the second timer.
        assert_eq!(resolve_position(&ledger, 1).unwrap(), second.id);
    }
}
