//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Webcam focus tracker.
///
/// Watches the camera for a face and logs how long you stay in front of it.
/// Focus sessions shorter than the configured minimum are discarded.
#[derive(Debug, Parser)]
#[command(name = "ft", version, about, long_about = None)]
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
    /// Track focus from the webcam until a key is pressed (default).
    Run,

    /// Drive the tracker from a recorded presence trace.
    Replay {
        /// Trace file with `<offset-seconds> <0|1>` lines.
        trace: PathBuf,

        /// Wall-clock time of offset 0 (ISO 8601 or e.g. "2 hours ago").
        /// Defaults to now.
        #[arg(long)]
        start: Option<String>,
    },

    /// Show configuration and recent log entries.
    Status {
        /// Number of log entries to show.
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}
