//! Engine types
//!
//! Message types and configuration for the sync engine.

use crate::error::Result;
use crate::report::ReportConfig;
use crate::stream::{json_schema, EntityKind, Record};
use crate::types::{JsonObject, JsonValue};
use crate::validation::{RelationshipStatus, Verdict, VerdictStatus, Violation};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Advisory validation result attached to a forwarded record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Verdict status
    pub status: VerdictStatus,
    /// Failed rules, in rule order
    pub violations: Vec<Violation>,
    /// Relationship check outcome
    pub relationship: RelationshipStatus,
    /// When the record was validated
    pub validated_at: DateTime<Utc>,
}

impl Annotation {
    /// Build an annotation from a verdict
    pub fn from_verdict(verdict: &Verdict) -> Self {
        Self {
            status: verdict.status(),
            violations: verdict.violations.clone(),
            relationship: verdict.relationship,
            validated_at: Utc::now(),
        }
    }
}

/// A message emitted during sync
///
/// Serializes to one tap output line: `{"type": "SCHEMA", ...}` or
/// `{"type": "RECORD", ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    /// Stream schema, emitted once before the stream's records
    Schema {
        /// Stream name
        stream: String,
        /// JSON schema of the records
        schema: JsonValue,
        /// Primary key fields
        key_properties: Vec<String>,
    },
    /// A single record
    Record {
        /// Stream name
        stream: String,
        /// The record exactly as received
        record: JsonObject,
        /// Present only when the record was flagged
        #[serde(
            rename = "validation",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        annotation: Option<Annotation>,
        /// When the record was extracted
        time_extracted: DateTime<Utc>,
    },
}

impl Message {
    /// Create a schema message for a kind
    pub fn schema(kind: EntityKind) -> Self {
        Self::Schema {
            stream: kind.stream_name().to_string(),
            schema: json_schema(kind),
            key_properties: kind.primary_key().iter().map(ToString::to_string).collect(),
        }
    }

    /// Create a record message
    pub fn record(record: Record, annotation: Option<Annotation>) -> Self {
        Self::Record {
            stream: record.kind().stream_name().to_string(),
            record: record.into_fields(),
            annotation,
            time_extracted: Utc::now(),
        }
    }

    /// Stream name
    pub fn stream(&self) -> &str {
        match self {
            Self::Schema { stream, .. } | Self::Record { stream, .. } => stream,
        }
    }

    /// Check if this is a record message
    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record { .. })
    }

    /// Check if this is a schema message
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema { .. })
    }

    /// Validation annotation of a record message
    pub fn annotation(&self) -> Option<&Annotation> {
        match self {
            Self::Record { annotation, .. } => annotation.as_ref(),
            Self::Schema { .. } => None,
        }
    }
}

/// Destination for emitted messages
pub trait MessageSink: Send {
    /// Emit one message
    fn emit(&mut self, message: Message) -> Result<()>;

    /// Flush buffered output
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl MessageSink for Vec<Message> {
    fn emit(&mut self, message: Message) -> Result<()> {
        self.push(message);
        Ok(())
    }
}

/// Where the set of known post IDs comes from when comments are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipMode {
    /// Read the whole posts collection before comments are validated
    #[default]
    Prefetch,
    /// Only posts processed earlier in the same run count
    InRun,
}

/// Configuration for sync operation
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncConfig {
    /// Strict/advisory policy and violation cap
    pub report: ReportConfig,
    /// Source of known post IDs for comments
    pub relationship_mode: RelationshipMode,
    /// Maximum records read per stream (0 = unlimited)
    pub max_records: usize,
}

impl SyncConfig {
    /// Create a new sync config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the report config
    #[must_use]
    pub fn with_report(mut self, report: ReportConfig) -> Self {
        self.report = report;
        self
    }

    /// Set the relationship mode
    #[must_use]
    pub fn with_relationship_mode(mut self, mode: RelationshipMode) -> Self {
        self.relationship_mode = mode;
        self
    }

    /// Set max records
    #[must_use]
    pub fn with_max_records(mut self, max: usize) -> Self {
        self.max_records = max;
        self
    }
}

/// Statistics from a sync operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncStats {
    /// Records read from the source
    pub records_fetched: usize,
    /// Pages read from the source
    pub pages_fetched: usize,
    /// Records written to the sink
    pub records_emitted: usize,
    /// Records left out by the stream filter
    pub records_filtered: usize,
    /// Invalid records dropped in strict mode
    pub records_dropped: usize,
    /// Streams synced
    pub streams_synced: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl SyncStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Add fetched records
    pub fn add_fetched(&mut self, count: usize) {
        self.records_fetched += count;
    }

    /// Add a page
    pub fn add_page(&mut self) {
        self.pages_fetched += 1;
    }

    /// Add an emitted record
    pub fn add_emitted(&mut self) {
        self.records_emitted += 1;
    }

    /// Add a filtered record
    pub fn add_filtered(&mut self) {
        self.records_filtered += 1;
    }

    /// Add a dropped record
    pub fn add_dropped(&mut self) {
        self.records_dropped += 1;
    }

    /// Add a stream
    pub fn add_stream(&mut self) {
        self.streams_synced += 1;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}
