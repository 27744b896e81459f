//! The `tm archive` command.

use anyhow::Result;
use chrono::{Local, Utc};
use tm_core::day_start;
use tm_db::Ledger;

/// Archives every timer last started before today's local midnight.
/// Banked time is kept for reporting.
pub fn run(ledger: &mut Ledger) -> Result<()> {
    let now = Utc::now().timestamp();
    let cutoff = day_start(&Local, now);

    let archived = ledger.archive_before(cutoff)?;
    if archived == 0 {
        println!("Nothing to archive");
    } else {
        println!("Archived {archived} timer(s)");
    }
    Ok(())
}
