//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

/// Personal time tracker.
///
/// Tracks time against named accounts with pause/resume timers, and
/// reports hours-and-tenths totals by week, month or account.
#[derive(Debug, Parser)]
#[command(name = "tm", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new account.
    AddAccount {
        /// The account name (must be unique).
        name: String,
    },

    /// List all accounts.
    Accounts,

    /// Create a new timer on an account.
    AddTimer {
        /// The account to bill the timer against (created if missing).
        account: String,

        /// A short note describing the work.
        #[arg(short, long, default_value = "")]
        memo: String,
    },

    /// List timers. Positions shown here are what start/pause take.
    Timers {
        /// Include archived timers.
        #[arg(short, long)]
        all: bool,
    },

    /// Start (or resume) a timer by its listed position.
    Start {
        /// Position in the current `tm timers` listing.
        position: usize,
    },

    /// Pause a running timer by its listed position.
    Pause {
        /// Position in the current `tm timers` listing.
        position: usize,
    },

    /// Archive timers last started before today.
    Archive,

    /// Report recorded time.
    Report {
        #[command(subcommand)]
        period: ReportPeriod,
    },

    /// Bulk-import accounts and time entries from a snapshot file.
    Populate {
        /// Path to the snapshot file.
        #[arg(short, long)]
        file: PathBuf,

        /// Snapshot file format.
        #[arg(long, value_enum, default_value_t = SnapshotFormat::Json)]
        format: SnapshotFormat,
    },
}

/// Report periods.
#[derive(Debug, Subcommand)]
pub enum ReportPeriod {
    /// Daily breakdown for one week (defaults to the current week).
    Week {
        /// Any date inside the week, as YYYY-MM-DD.
        date: Option<NaiveDate>,
    },

    /// Per-account totals for one month (defaults to the current month).
    Month {
        /// The month, as YYYY-MM.
        month: Option<String>,
    },

    /// Month-by-month history for one account.
    Account {
        /// The account name.
        name: String,

        /// First month to include, as YYYY-MM.
        #[arg(long)]
        from: Option<String>,

        /// Last month to include, as YYYY-MM.
        #[arg(long)]
        to: Option<String>,
    },
}

/// Supported snapshot file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SnapshotFormat {
    Json,
    Yaml,
}
