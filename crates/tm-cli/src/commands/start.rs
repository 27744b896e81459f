//! The `tm start` command.

use anyhow::Result;
use chrono::{Local, Utc};
use tm_core::day_start;
use tm_db::{Ledger, StartOutcome};

use super::timers::resolve_position;

/// Starts the timer at the given listing position.
///
/// Any running timer is paused first; a timer last started on a
/// previous day rolls over into a fresh one.
pub fn run(ledger: &mut Ledger, position: usize) -> Result<()> {
    let id = resolve_position(ledger, position)?;
    let now = Utc::now().timestamp();
    let today = day_start(&Local, now);

    match ledger.start_timer(id, now, today)? {
        StartOutcome::Started(timer) => {
            tracing::debug!(id = timer.id, "timer started");
            println!("Started timer {}", timer.id);
        }
        StartOutcome::RolledOver { archived_id, timer } => {
            println!(
                "Timer {archived_id} was from a previous day; archived it and started fresh timer {}",
                timer.id
            );
        }
    }
    Ok(())
}
