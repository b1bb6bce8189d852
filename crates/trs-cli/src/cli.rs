//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// A terminal-based time-recording system.
///
/// Start and stop a single running time entry and see how long you worked today.
#[derive(Debug, Parser)]
#[command(name = "trs", version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Initialise the trs database (stored at $HOME/.trs.db by default).
    Init,

    /// Start a time entry.
    Start,

    /// Stop the currently running time entry.
    Stop,

    /// Print the amount of time worked today.
    Today,
}
