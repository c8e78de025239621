//! Captured tap output reader
//!
//! Only `RECORD` messages for known streams are kept; other message types
//! and unknown streams are skipped. A `SCHEMA` message still marks its
//! stream as captured, so a stream whose records were all dropped replays as
//! an empty collection rather than a missing one.

use crate::decode::{JsonlDecoder, RecordDecoder};
use crate::engine::Message;
use crate::error::{Error, Result};
use crate::stream::EntityKind;
use crate::types::JsonValue;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Records recovered from a captured tap output, grouped by kind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TapOutput {
    records: BTreeMap<EntityKind, Vec<JsonValue>>,
    skipped: usize,
}

impl TapOutput {
    /// Records of one kind, in output order
    pub fn records(&self, kind: EntityKind) -> &[JsonValue] {
        self.records.get(&kind).map_or(&[][..], Vec::as_slice)
    }

    /// Total records across kinds
    pub fn total(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }

    /// Messages that were not records of a known stream
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Whether the capture contains the stream of `kind`
    pub fn has_stream(&self, kind: EntityKind) -> bool {
        self.records.contains_key(&kind)
    }

    /// Per-kind collections, captured streams only
    pub fn into_collections(self) -> BTreeMap<EntityKind, Vec<JsonValue>> {
        self.records
    }
}

/// Parse line-delimited tap output
///
/// A line that is not JSON is a decode error. Validation annotations are
/// discarded; only the records themselves are kept.
pub fn parse_tap_output(body: &str) -> Result<TapOutput> {
    let mut output = TapOutput::default();

    for line in JsonlDecoder::new().decode(body)? {
        match line.get("type").and_then(JsonValue::as_str) {
            Some("RECORD") => {}
            Some("SCHEMA") => {
                let kind = line
                    .get("stream")
                    .and_then(JsonValue::as_str)
                    .and_then(EntityKind::from_stream_name);
                if let Some(kind) = kind {
                    output.records.entry(kind).or_default();
                }
                output.skipped += 1;
                continue;
            }
            _ => {
                output.skipped += 1;
                continue;
            }
        }

        let message: Message = serde_json::from_value(line)
            .map_err(|e| Error::decode(format!("Malformed RECORD message: {e}")))?;
        let Message::Record { stream, record, .. } = message else {
            output.skipped += 1;
            continue;
        };

        match EntityKind::from_stream_name(&stream) {
            Some(kind) => output
                .records
                .entry(kind)
                .or_default()
                .push(JsonValue::Object(record)),
            None => {
                debug!("Skipping record for unknown stream '{stream}'");
                output.skipped += 1;
            }
        }
    }

    Ok(output)
}

/// Read a tap output file
pub fn read_tap_output(path: impl AsRef<Path>) -> Result<TapOutput> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let body = std::fs::read_to_string(path)?;
    let output = parse_tap_output(&body)?;
    debug!(
        "Read {} records from {} ({} other messages)",
        output.total(),
        path.display(),
        output.skipped()
    );
    Ok(output)
}
