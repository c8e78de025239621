//! Output module
//!
//! Writes tap messages as JSON lines and reads captured output back.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Serializing `SCHEMA`/`RECORD` messages to stdout or a file
//! - Writing the end-of-run report as JSON
//! - Reading a previously captured tap output into per-kind collections

mod reader;
mod writer;

pub use reader::{parse_tap_output, read_tap_output, TapOutput};
pub use writer::{write_json_file, MessageWriter, MessageWriterConfig};
