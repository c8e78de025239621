//! Message writer
//!
//! Serializes engine messages as one JSON document per line.

use crate::engine::{Message, MessageSink};
use crate::error::{Error, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Stdout, Write};
use std::path::Path;

/// Configuration for the message writer
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageWriterConfig {
    pretty: bool,
}

impl MessageWriterConfig {
    /// Create a new config with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretty-print each message (output is no longer line-delimited)
    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Whether pretty printing is on
    #[must_use]
    pub fn is_pretty(&self) -> bool {
        self.pretty
    }
}

/// Writes messages to any byte sink
pub struct MessageWriter<W: Write + Send> {
    /// Destination
    writer: W,
    /// Formatting options
    config: MessageWriterConfig,
    /// Number of messages written
    messages_written: usize,
}

impl MessageWriter<BufWriter<Stdout>> {
    /// Write to standard output
    pub fn stdout(config: MessageWriterConfig) -> Self {
        Self::new(BufWriter::new(io::stdout()), config)
    }
}

impl MessageWriter<BufWriter<File>> {
    /// Create (or truncate) a file and write to it
    pub fn create(path: impl AsRef<Path>, config: MessageWriterConfig) -> Result<Self> {
        let file = File::create(path.as_ref()).map_err(|e| {
            Error::output(format!(
                "Failed to create {}: {e}",
                path.as_ref().display()
            ))
        })?;
        Ok(Self::new(BufWriter::new(file), config))
    }
}

impl<W: Write + Send> MessageWriter<W> {
    /// Wrap a writer
    pub fn new(writer: W, config: MessageWriterConfig) -> Self {
        Self {
            writer,
            config,
            messages_written: 0,
        }
    }

    /// Write one serializable value followed by a newline
    pub fn write_value<T: Serialize>(&mut self, value: &T) -> Result<()> {
        if self.config.pretty {
            serde_json::to_writer_pretty(&mut self.writer, value)?;
        } else {
            serde_json::to_writer(&mut self.writer, value)?;
        }
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    /// Get the number of messages written so far
    #[must_use]
    pub fn messages_written(&self) -> usize {
        self.messages_written
    }

    /// Flush and return the underlying writer
    pub fn into_inner(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write + Send> MessageSink for MessageWriter<W> {
    fn emit(&mut self, message: Message) -> Result<()> {
        self.write_value(&message)?;
        self.messages_written += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Write a value as pretty JSON to a file
pub fn write_json_file<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json + "\n")
        .map_err(|e| Error::output(format!("Failed to write {}: {e}", path.display())))
}
