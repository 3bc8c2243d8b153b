use std::io;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ft_cli::commands::{replay, run, status, util};
use ft_cli::exit::exit_code_for;
use ft_cli::{Cli, Commands, Config};

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

fn dispatch(cli: &Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match &cli.command {
        None | Some(Commands::Run) => {
            run::run(io::stdout().lock(), &config)?;
        }
        Some(Commands::Replay { trace, start }) => {
            let start = match start {
                Some(s) => util::parse_datetime(s)?,
                None => Utc::now(),
            };
            replay::run(io::stdout().lock(), &config, trace, start)?;
        }
        Some(Commands::Status { limit }) => {
            status::run(&mut io::stdout().lock(), &config, *limit)?;
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    match dispatch(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(exit_code_for(&err))
        }
    }
}
