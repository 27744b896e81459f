//! Ledger store for the TimeMate timer manager.
//!
//! Provides durable storage for accounts and timers using `rusqlite`,
//! and the transactional timer-engine entry points (start, pause,
//! archive) that keep the at-most-one-running invariant observable at
//! every instant.
//!
//! # Thread Safety
//!
//! The [`Ledger`] type wraps a `rusqlite::Connection`, which is `Send`
//! but not `Sync`. A single process-wide handle is the intended usage;
//! there is no pooling.
//!
//! # Schema
//!
//! Timestamps are stored as INTEGER epoch seconds. `times.started_at`
//! is the timer's most recent recorded start instant; it is retained
//! across pauses so it can serve as the day-boundary reference for
//! rollover, the archive cutoff comparison, and the period-membership
//! key for reports.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use serde::Deserialize;
use thiserror::Error;

use tm_core::{
    Account, PauseOutcome, StartAction, Timer, TimerEntry, TimerStatus, start_action,
};

/// Ledger errors.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// An account with this name already exists.
    #[error("account '{name}' already exists")]
    DuplicateName { name: String },
    /// The referenced account does not exist.
    #[error("no account with id {id}")]
    UnknownAccount { id: i64 },
    /// The referenced timer does not exist.
    #[error("no timer with id {id}")]
    InvalidTimer { id: i64 },
}

/// Ledger connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Ledger {
    conn: Connection,
}

/// A timer joined with its account name, as returned by listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerRow {
    pub timer: Timer,
    pub account_name: String,
}

/// Which timers a listing includes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusFilter {
    /// Every timer regardless of status.
    All,
    /// Timers whose status is in the given set.
    Any(Vec<TimerStatus>),
}

impl StatusFilter {
    /// The default listing filter: paused and running timers.
    #[must_use]
    pub fn active() -> Self {
        Self::Any(vec![TimerStatus::Paused, TimerStatus::Running])
    }
}

/// Result of starting a timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// The timer was resumed (or started for the first time) in place.
    Started(Timer),
    /// The timer last ran on a previous day: a fresh timer was created
    /// on the same account and the original was archived.
    RolledOver {
        /// Id of the now-inactive original timer.
        archived_id: i64,
        /// The freshly created running timer.
        timer: Timer,
    },
}

impl StartOutcome {
    /// The timer that is now running.
    #[must_use]
    pub const fn timer(&self) -> &Timer {
        match self {
            Self::Started(timer) | Self::RolledOver { timer, .. } => timer,
        }
    }
}

/// Bulk-import document: accounts plus pre-banked time entries.
#[derive(Debug, Clone, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub accounts: Vec<SnapshotAccount>,
    #[serde(default)]
    pub times: Vec<SnapshotTime>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotAccount {
    pub account_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotTime {
    pub account_name: String,
    #[serde(default)]
    pub memo: String,
    /// Pre-banked seconds.
    #[serde(default)]
    pub timedelta: i64,
    /// Epoch seconds of the recorded start.
    #[serde(default)]
    pub datetime: Option<i64>,
}

/// Counts from a bulk import pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub accounts_added: usize,
    pub accounts_skipped: usize,
    pub timers_added: usize,
    pub timers_skipped: usize,
}

impl Ledger {
    /// Opens a ledger at the given path, creating it if necessary.
    ///
    /// The schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, LedgerError> {
        let conn = Connection::open(path)?;
        let ledger = Self { conn };
        ledger.init()?;
        Ok(ledger)
    }

    /// Opens an in-memory ledger.
    ///
    /// Useful for testing. The data is destroyed when the connection
    /// closes.
    pub fn open_in_memory() -> Result<Self, LedgerError> {
        let conn = Connection::open_in_memory()?;
        let ledger = Self { conn };
        ledger.init()?;
        Ok(ledger)
    }

    /// Initializes the schema.
    ///
    /// This is idempotent - safe to call on an already-initialized
    /// database.
    fn init(&self) -> Result<(), LedgerError> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS accounts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE,
                created_at INTEGER NOT NULL
            );

            -- started_at: epoch seconds of the most recent start instant
            -- (retained across pauses as the rollover reference point)
            CREATE TABLE IF NOT EXISTS times (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                account_id INTEGER NOT NULL,
                memo TEXT NOT NULL DEFAULT '',
                status TEXT NOT NULL
                    CHECK(status IN ('paused', 'running', 'inactive'))
                    DEFAULT 'paused',
                accumulated_seconds INTEGER NOT NULL DEFAULT 0,
                started_at INTEGER,
                FOREIGN KEY (account_id) REFERENCES accounts(id)
            );

            CREATE INDEX IF NOT EXISTS idx_times_status ON times(status);
            CREATE INDEX IF NOT EXISTS idx_times_started ON times(started_at);
            CREATE INDEX IF NOT EXISTS idx_times_account ON times(account_id);
            ",
        )?;
        Ok(())
    }

    /// Creates an account, failing on a duplicate name (exact match).
    pub fn create_account(&mut self, name: &str, now: i64) -> Result<Account, LedgerError> {
        let result = self.conn.execute(
            "INSERT INTO accounts (name, created_at) VALUES (?, ?)",
            params![name, now],
        );
        match result {
            Ok(_) => Ok(Account {
                id: self.conn.last_insert_rowid(),
                name: name.to_string(),
                created_at: now,
            }),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(LedgerError::DuplicateName {
                    name: name.to_string(),
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Returns the account with the given name, creating it if missing.
    ///
    /// This is the single well-defined path for name-based account
    /// resolution; timer creation never creates accounts implicitly.
    pub fn resolve_or_create_account(
        &mut self,
        name: &str,
        now: i64,
    ) -> Result<Account, LedgerError> {
        if let Some(account) = self.account_by_name(name)? {
            return Ok(account);
        }
        self.create_account(name, now)
    }

    /// Looks up an account by exact name.
    pub fn account_by_name(&self, name: &str) -> Result<Option<Account>, LedgerError> {
        let account = self
            .conn
            .query_row(
                "SELECT id, name, created_at FROM accounts WHERE name = ?",
                [name],
                |row| {
                    Ok(Account {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        created_at: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(account)
    }

    /// Lists all accounts ordered by id.
    pub fn list_accounts(&self) -> Result<Vec<Account>, LedgerError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, created_at FROM accounts ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok(Account {
                id: row.get(0)?,
                name: row.get(1)?,
                created_at: row.get(2)?,
            })
        })?;
        let mut accounts = Vec::new();
        for row in rows {
            accounts.push(row?);
        }
        Ok(accounts)
    }

    /// Creates a paused timer with zero banked time on an existing
    /// account. The creation instant is recorded as `started_at` so the
    /// timer lists with a date and archives correctly.
    pub fn create_timer(
        &mut self,
        account_id: i64,
        memo: &str,
        now: i64,
    ) -> Result<Timer, LedgerError> {
        if !self.account_exists(account_id)? {
            return Err(LedgerError::UnknownAccount { id: account_id });
        }
        self.conn.execute(
            "
            INSERT INTO times (account_id, memo, status, accumulated_seconds, started_at)
            VALUES (?, ?, 'paused', 0, ?)
            ",
            params![account_id, memo, now],
        )?;
        Ok(Timer {
            id: self.conn.last_insert_rowid(),
            account_id,
            memo: memo.to_string(),
            status: TimerStatus::Paused,
            accumulated_seconds: 0,
            started_at: Some(now),
        })
    }

    fn account_exists(&self, account_id: i64) -> Result<bool, LedgerError> {
        let found = self
            .conn
            .query_row("SELECT 1 FROM accounts WHERE id = ?", [account_id], |_| {
                Ok(())
            })
            .optional()?;
        Ok(found.is_some())
    }

    /// Fetches a timer by id.
    pub fn get_timer(&self, id: i64) -> Result<Timer, LedgerError> {
        get_timer_on(&self.conn, id)
    }

    /// Replaces a timer's mutable fields (status, banked seconds,
    /// start instant) in one statement.
    pub fn update_timer(&mut self, timer: &Timer) -> Result<(), LedgerError> {
        update_timer_on(&self.conn, timer)
    }

    /// Lists timers joined with their account names, ordered by id.
    pub fn list_timers(&self, filter: &StatusFilter) -> Result<Vec<TimerRow>, LedgerError> {
        let base = "
            SELECT T.id, T.account_id, T.memo, T.status, T.accumulated_seconds,
                   T.started_at, A.name
            FROM times T
            JOIN accounts A ON T.account_id = A.id
        ";
        let (sql, statuses) = match filter {
            StatusFilter::All => (format!("{base} ORDER BY T.id ASC"), Vec::new()),
            StatusFilter::Any(statuses) => {
                let placeholders = vec!["?"; statuses.len()].join(", ");
                (
                    format!("{base} WHERE T.status IN ({placeholders}) ORDER BY T.id ASC"),
                    statuses.iter().map(TimerStatus::as_str).collect(),
                )
            }
        };
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(statuses.iter()), |row| {
            Ok(TimerRow {
                timer: timer_from_row(row)?,
                account_name: row.get(6)?,
            })
        })?;
        let mut timers = Vec::new();
        for row in rows {
            timers.push(row?);
        }
        Ok(timers)
    }

    /// Sums banked seconds over timers whose recorded start falls in the
    /// half-open range, regardless of current status.
    ///
    /// Interval membership follows the start timestamp: a timer logs
    /// against the period in which it started.
    pub fn sum_durations(
        &self,
        account_id: Option<i64>,
        start: Option<i64>,
        end: Option<i64>,
    ) -> Result<i64, LedgerError> {
        let mut clauses = Vec::new();
        let mut params: Vec<i64> = Vec::new();
        if let Some(start) = start {
            clauses.push("started_at >= ?");
            params.push(start);
        }
        if let Some(end) = end {
            clauses.push("started_at < ?");
            params.push(end);
        }
        if let Some(account_id) = account_id {
            clauses.push("account_id = ?");
            params.push(account_id);
        }
        let mut sql = "SELECT COALESCE(SUM(accumulated_seconds), 0) FROM times".to_string();
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        let total = self
            .conn
            .query_row(&sql, params_from_iter(params.iter()), |row| row.get(0))?;
        Ok(total)
    }

    /// Report feed: entries whose recorded start falls in the half-open
    /// range, ordered by start timestamp then id.
    pub fn entries_in_range(
        &self,
        account_id: Option<i64>,
        start: i64,
        end: i64,
    ) -> Result<Vec<TimerEntry>, LedgerError> {
        let base = "
            SELECT T.account_id, A.name, T.memo, T.accumulated_seconds, T.started_at
            FROM times T
            JOIN accounts A ON T.account_id = A.id
            WHERE T.started_at >= ? AND T.started_at < ?
        ";
        let (sql, params) = match account_id {
            Some(account_id) => (
                format!("{base} AND T.account_id = ? ORDER BY T.started_at ASC, T.id ASC"),
                vec![start, end, account_id],
            ),
            None => (
                format!("{base} ORDER BY T.started_at ASC, T.id ASC"),
                vec![start, end],
            ),
        };
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(params.iter()), |row| {
            Ok(TimerEntry {
                account_id: row.get(0)?,
                account_name: row.get(1)?,
                memo: row.get(2)?,
                seconds: row.get(3)?,
                started_at: row.get(4)?,
            })
        })?;
        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    /// The min/max recorded start timestamps for an account, if it has
    /// any dated timers. Used to bound account-history reports.
    pub fn account_recorded_range(
        &self,
        account_id: i64,
    ) -> Result<Option<(i64, i64)>, LedgerError> {
        let (min, max): (Option<i64>, Option<i64>) = self.conn.query_row(
            "SELECT MIN(started_at), MAX(started_at) FROM times WHERE account_id = ?",
            [account_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        Ok(min.zip(max))
    }

    /// Starts a timer as of `now`, applied as one transaction.
    ///
    /// Any running timer is paused first, banking its open interval.
    /// If the target timer's recorded start predates `day_start`, it is
    /// not resumed in place: a fresh running timer is forked on the same
    /// account and the original goes inactive (stale-timer rollover).
    pub fn start_timer(
        &mut self,
        id: i64,
        now: i64,
        day_start: i64,
    ) -> Result<StartOutcome, LedgerError> {
        let tx = self.conn.transaction()?;

        // Bank every running timer (including the target, so restarting
        // a running timer never drops its open interval).
        tx.execute(
            "
            UPDATE times
            SET status = 'paused',
                accumulated_seconds = accumulated_seconds + (?1 - started_at),
                started_at = ?1
            WHERE status = 'running'
            ",
            [now],
        )?;

        let mut timer = get_timer_on(&tx, id)?;
        let outcome = match start_action(&timer, day_start) {
            StartAction::Resume => {
                timer.resume(now);
                update_timer_on(&tx, &timer)?;
                StartOutcome::Started(timer)
            }
            StartAction::Rollover => {
                tx.execute(
                    "
                    INSERT INTO times (account_id, memo, status, accumulated_seconds, started_at)
                    VALUES (?, ?, 'running', 0, ?)
                    ",
                    params![timer.account_id, timer.memo, now],
                )?;
                let fresh = Timer {
                    id: tx.last_insert_rowid(),
                    account_id: timer.account_id,
                    memo: timer.memo.clone(),
                    status: TimerStatus::Running,
                    accumulated_seconds: 0,
                    started_at: Some(now),
                };
                timer.status = TimerStatus::Inactive;
                update_timer_on(&tx, &timer)?;
                tracing::debug!(archived = timer.id, fresh = fresh.id, "stale timer rolled over");
                StartOutcome::RolledOver {
                    archived_id: timer.id,
                    timer: fresh,
                }
            }
        };

        tx.commit()?;
        Ok(outcome)
    }

    /// Pauses a timer as of `now`, banking its open interval.
    ///
    /// Pausing a timer that is not running changes nothing and reports
    /// [`PauseOutcome::AlreadyPaused`].
    pub fn pause_timer(
        &mut self,
        id: i64,
        now: i64,
    ) -> Result<(PauseOutcome, Timer), LedgerError> {
        let tx = self.conn.transaction()?;
        let mut timer = get_timer_on(&tx, id)?;
        let outcome = timer.bank(now);
        if outcome == PauseOutcome::Paused {
            update_timer_on(&tx, &timer)?;
        }
        tx.commit()?;
        Ok((outcome, timer))
    }

    /// Archives every non-inactive timer whose recorded start predates
    /// `cutoff`. Banked seconds are untouched. Returns the number of
    /// timers archived.
    pub fn archive_before(&mut self, cutoff: i64) -> Result<usize, LedgerError> {
        let archived = self.conn.execute(
            "
            UPDATE times
            SET status = 'inactive'
            WHERE started_at IS NOT NULL AND started_at < ? AND status != 'inactive'
            ",
            [cutoff],
        )?;
        Ok(archived)
    }

    /// Applies a bulk-import snapshot in one transaction.
    ///
    /// Duplicate account names and time entries naming unknown accounts
    /// are skipped with a warning; the rest of the import proceeds.
    pub fn import_snapshot(
        &mut self,
        snapshot: &Snapshot,
        now: i64,
    ) -> Result<ImportStats, LedgerError> {
        let tx = self.conn.transaction()?;
        let mut stats = ImportStats::default();

        for account in &snapshot.accounts {
            let inserted = tx.execute(
                "INSERT OR IGNORE INTO accounts (name, created_at) VALUES (?, ?)",
                params![account.account_name, now],
            )?;
            if inserted == 0 {
                tracing::warn!(name = %account.account_name, "account already exists, skipping");
                stats.accounts_skipped += 1;
            } else {
                stats.accounts_added += 1;
            }
        }

        for time in &snapshot.times {
            let account_id: Option<i64> = tx
                .query_row(
                    "SELECT id FROM accounts WHERE name = ?",
                    [&time.account_name],
                    |row| row.get(0),
                )
                .optional()?;
            let Some(account_id) = account_id else {
                tracing::warn!(name = %time.account_name, "account not found, skipping timer");
                stats.timers_skipped += 1;
                continue;
            };
            tx.execute(
                "
                INSERT INTO times (account_id, memo, status, accumulated_seconds, started_at)
                VALUES (?, ?, 'paused', ?, ?)
                ",
                params![account_id, time.memo, time.timedelta, time.datetime],
            )?;
            stats.timers_added += 1;
        }

        tx.commit()?;
        Ok(stats)
    }
}

fn get_timer_on(conn: &Connection, id: i64) -> Result<Timer, LedgerError> {
    conn.query_row(
        "
        SELECT id, account_id, memo, status, accumulated_seconds, started_at
        FROM times
        WHERE id = ?
        ",
        [id],
        timer_from_row,
    )
    .optional()?
    .ok_or(LedgerError::InvalidTimer { id })
}

fn update_timer_on(conn: &Connection, timer: &Timer) -> Result<(), LedgerError> {
    let updated = conn.execute(
        "
        UPDATE times
        SET status = ?, accumulated_seconds = ?, started_at = ?
        WHERE id = ?
        ",
        params![
            timer.status.as_str(),
            timer.accumulated_seconds,
            timer.started_at,
            timer.id,
        ],
    )?;
    if updated == 0 {
        return Err(LedgerError::InvalidTimer { id: timer.id });
    }
    Ok(())
}

fn timer_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Timer> {
    let status: String = row.get(3)?;
    let status = status.parse::<TimerStatus>().map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(err))
    })?;
    Ok(Timer {
        id: row.get(0)?,
        account_id: row.get(1)?,
        memo: row.get(2)?,
        status,
        accumulated_seconds: row.get(4)?,
        started_at: row.get(5)?,
    })
}
