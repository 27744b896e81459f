//! Core domain logic for the TimeMate timer manager.
//!
//! This crate contains the fundamental types and logic for:
//! - The timer state machine: pause/resume banking and stale-timer rollover
//! - Elapsed-time computation and duration formatting
//! - Day/week/month boundary math, injectable by timezone
//! - Report aggregation over timer entries

pub mod format;
pub mod period;
pub mod report;
pub mod timer;

pub use format::{format_hms, format_hours_tenths};
pub use period::{
    day_bounds, day_start, first_of_month, local_date, month_bounds, next_month, week_bounds,
    week_start,
};
pub use report::{AccountTotal, DayTotal, TimerEntry, WeekReport, month_report, week_report};
pub use timer::{
    Account, PauseOutcome, StartAction, Timer, TimerStatus, ValidationError, start_action,
};
