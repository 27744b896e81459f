//! The `tm pause` command.

use anyhow::Result;
use chrono::Utc;
use tm_core::{PauseOutcome, format_hms};
use tm_db::Ledger;

use super::timers::resolve_position;

/// Pauses the timer at the given listing position, banking its open
/// interval. Pausing an already-paused timer is a no-op.
pub fn run(ledger: &mut Ledger, position: usize) -> Result<()> {
    let id = resolve_position(ledger, position)?;
    let now = Utc::now().timestamp();

    let (outcome, timer) = ledger.pause_timer(id, now)?;
    match outcome {
        PauseOutcome::Paused => {
            println!(
                "Paused timer {} at {}",
                timer.id,
                format_hms(timer.accumulated_seconds)
            );
        }
        PauseOutcome::AlreadyPaused => {
            println!("Timer {} is not running", timer.id);
        }
    }
    Ok(())
}
