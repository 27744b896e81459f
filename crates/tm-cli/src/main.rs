use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tm_cli::commands::{accounts, archive, pause, populate, report, start, timers};
use tm_cli::{Cli, Commands, Config, ReportPeriod};

/// Load config and open the ledger, ensuring the parent directory exists.
fn open_ledger(config_path: Option<&Path>) -> Result<(tm_db::Ledger, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let ledger = tm_db::Ledger::open(&config.database_path).context("failed to open database")?;
    Ok((ledger, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    match &cli.command {
        Some(Commands::AddAccount { name }) => {
            let (mut ledger, _config) = open_ledger(cli.config.as_deref())?;
            accounts::add(&mut ledger, name)?;
        }
        Some(Commands::Accounts) => {
            let (ledger, _config) = open_ledger(cli.config.as_deref())?;
            accounts::list(&ledger)?;
        }
        Some(Commands::AddTimer { account, memo }) => {
            let (mut ledger, _config) = open_ledger(cli.config.as_deref())?;
            timers::add(&mut ledger, account, memo)?;
        }
        Some(Commands::Timers { all }) => {
            let (ledger, _config) = open_ledger(cli.config.as_deref())?;
            timers::list(&ledger, *all)?;
        }
        Some(Commands::Start { position }) => {
            let (mut ledger, _config) = open_ledger(cli.config.as_deref())?;
            start::run(&mut ledger, *position)?;
        }
        Some(Commands::Pause { position }) => {
            let (mut ledger, _config) = open_ledger(cli.config.as_deref())?;
            pause::run(&mut ledger, *position)?;
        }
        Some(Commands::Archive) => {
            let (mut ledger, _config) = open_ledger(cli.config.as_deref())?;
            archive::run(&mut ledger)?;
        }
        Some(Commands::Report { period }) => {
            let (ledger, config) = open_ledger(cli.config.as_deref())?;
            match period {
                ReportPeriod::Week { date } => {
                    report::week(&ledger, config.round_up_minutes, *date)?;
                }
                ReportPeriod::Month { month } => {
                    report::month(&ledger, config.round_up_minutes, month.as_deref())?;
                }
                ReportPeriod::Account { name, from, to } => {
                    report::account(
                        &ledger,
                        config.round_up_minutes,
                        name,
                        from.as_deref(),
                        to.as_deref(),
                    )?;
                }
            }
        }
        Some(Commands::Populate { file, format }) => {
            let (mut ledger, _config) = open_ledger(cli.config.as_deref())?;
            populate::run(&mut ledger, file, *format)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
