//! CLI commands and argument parsing

use crate::types::Parity;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Validating tap for the JSONPlaceholder users, posts and comments
#[derive(Parser, Debug)]
#[command(name = "tap-jsonplaceholder")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (JSON, or YAML with a .yaml/.yml extension)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Inline config JSON (takes precedence over --config)
    #[arg(long, global = true)]
    pub config_json: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show configuration specification
    Spec,

    /// Test connection to the API
    Check,

    /// Discover available streams
    Discover,

    /// Read, filter and validate records
    Read {
        /// Streams to sync (comma-separated, empty = all)
        #[arg(long)]
        streams: Option<String>,

        /// Drop invalid records instead of flagging them
        #[arg(long)]
        strict: bool,

        /// Maximum violation entries kept in the report
        #[arg(long)]
        report_cap: Option<usize>,

        /// Post id parity to forward (even, odd, any)
        #[arg(long)]
        parity: Option<Parity>,

        /// Maximum records per stream
        #[arg(long)]
        max_records: Option<usize>,

        /// Write messages to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the validation report as JSON to this file
        #[arg(long)]
        report: Option<PathBuf>,

        /// Replay records from a captured tap output instead of the API
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Compute post and user engagement metrics from captured tap output
    Analyze {
        /// Captured tap output (JSON lines)
        #[arg(short, long)]
        input: PathBuf,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
