use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use trs_cli::commands::{init, start, stop, today};
use trs_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so stdout carries only command output
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let mut stdout = std::io::stdout().lock();
    let path = config.database_path.as_path();
    match cli.command {
        Commands::Init => init::run(&mut stdout, path)?,
        Commands::Start => start::run(&mut stdout, path, Local::now())?,
        Commands::Stop => stop::run(&mut stdout, path, Local::now())?,
        Commands::Today => today::run(&mut stdout, path, Local::now())?,
    }

    Ok(())
}
