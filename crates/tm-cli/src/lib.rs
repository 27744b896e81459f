//! TimeMate CLI library.
//!
//! This crate provides the command-line interface for the TimeMate
//! timer manager.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, ReportPeriod, SnapshotFormat};
pub use config::Config;
