//! CLI module
//!
//! Command-line interface for running the tap.
//!
//! # Commands
//!
//! - `spec` - Print the configuration schema
//! - `check` - Test connection to the API
//! - `discover` - List available streams
//! - `read` - Extract, filter and validate records
//! - `analyze` - Compute engagement metrics from captured output

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::{ReadOptions, Runner};
