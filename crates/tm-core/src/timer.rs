//! Timer and account types with the pause/running/inactive state machine.
//!
//! All timestamps are epoch seconds. A timer banks elapsed time into
//! `accumulated_seconds` each time it leaves the running state; the open
//! running interval is only ever materialized by [`Timer::elapsed`].

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Invalid timer status value.
    #[error("invalid timer status: {value}")]
    InvalidStatus { value: String },
}

/// Lifecycle state of a timer.
///
/// This enum encodes the valid status values, preventing invalid strings
/// from reaching the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    /// Not accruing time; the initial state.
    Paused,
    /// Accruing time since `started_at`.
    Running,
    /// Soft-archived; excluded from the active listing.
    Inactive,
}

impl TimerStatus {
    /// String representation for database storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Paused => "paused",
            Self::Running => "running",
            Self::Inactive => "inactive",
        }
    }
}

impl fmt::Display for TimerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TimerStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paused" => Ok(Self::Paused),
            "running" => Ok(Self::Running),
            "inactive" => Ok(Self::Inactive),
            _ => Err(ValidationError::InvalidStatus {
                value: s.to_string(),
            }),
        }
    }
}

/// A named bucket of activity that time is tracked against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    /// Epoch seconds at creation.
    pub created_at: i64,
}

/// One discrete trackable span of time against an account.
///
/// `started_at` is the most recent recorded start instant. It is set when
/// the timer starts running and retained (updated to the pause instant) on
/// pause, so it stays available as the reference point for day-boundary
/// rollover, archiving, and period membership in reports. It is `None`
/// only for rows that have never run and carry no imported timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    pub id: i64,
    pub account_id: i64,
    pub memo: String,
    pub status: TimerStatus,
    pub accumulated_seconds: i64,
    pub started_at: Option<i64>,
}

/// Result of a pause request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseOutcome {
    /// The open interval was banked and the timer paused.
    Paused,
    /// The timer was not running; nothing changed.
    AlreadyPaused,
}

/// What `start` should do with a timer, decided against the current day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartAction {
    /// Resume the timer in place, keeping its accumulated time.
    Resume,
    /// The timer last ran on a previous day: fork a fresh timer on the
    /// same account and archive this one.
    Rollover,
}

impl Timer {
    /// Total elapsed seconds as of `now`: banked time plus the open
    /// running interval, if any.
    #[must_use]
    pub fn elapsed(&self, now: i64) -> i64 {
        match (self.status, self.started_at) {
            (TimerStatus::Running, Some(started_at)) => {
                self.accumulated_seconds + (now - started_at)
            }
            _ => self.accumulated_seconds,
        }
    }

    /// Folds the open running interval into `accumulated_seconds` and
    /// pauses the timer. The pause instant is retained in `started_at` as
    /// the last-known reference point for later rollover comparisons.
    ///
    /// Idempotent: a timer that is not running is left untouched.
    pub fn bank(&mut self, now: i64) -> PauseOutcome {
        let (TimerStatus::Running, Some(started_at)) = (self.status, self.started_at) else {
            return PauseOutcome::AlreadyPaused;
        };
        self.accumulated_seconds += now - started_at;
        self.status = TimerStatus::Paused;
        self.started_at = Some(now);
        PauseOutcome::Paused
    }

    /// Marks the timer running as of `now`, leaving banked time intact.
    pub fn resume(&mut self, now: i64) {
        self.status = TimerStatus::Running;
        self.started_at = Some(now);
    }
}

/// Decides whether starting `timer` resumes it in place or rolls it over.
///
/// A timer whose reference timestamp predates `day_start` never resumes:
/// running time must not span a midnight boundary, so each calendar day's
/// work becomes its own timer record.
#[must_use]
pub fn start_action(timer: &Timer, day_start: i64) -> StartAction {
    match timer.started_at {
        Some(started_at) if started_at < day_start => StartAction::Rollover,
        _ => StartAction::Resume,
    }
}
