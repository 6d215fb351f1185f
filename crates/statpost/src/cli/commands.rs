//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// statpost - turn fresh statistics into social media posts
#[derive(Parser, Debug)]
#[command(name = "statpost")]
#[command(about = "Turn fresh statistics into social media posts", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Extra configuration file, layered over the defaults
    #[arg(short, long, global = true, env = "STATPOST_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run once; exit non-zero on failure
    Run {
        /// Generate and record the post but do not publish it
        #[arg(long)]
        no_publish: bool,
    },

    /// Run once and print a {statusCode, body} document; never fails
    Invoke,

    /// Show the stored statistics and recent posts
    State {
        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,

        /// Number of recent posts to show
        #[arg(long, default_value_t = 5)]
        recent: usize,
    },
}

/// Output format for state display
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}
