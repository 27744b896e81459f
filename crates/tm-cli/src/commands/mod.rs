//! CLI subcommand implementations.

pub mod accounts;
pub mod archive;
pub mod pause;
pub mod populate;
pub mod report;
pub mod start;
pub mod timers;
