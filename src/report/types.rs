//! Report types

use crate::stream::EntityKind;
use crate::validation::ViolationCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Default number of violation entries retained per run
pub const DEFAULT_VIOLATION_REPORT_CAP: usize = 100;

/// Reporter configuration, fixed for the lifetime of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportConfig {
    /// Drop invalid records instead of forwarding them flagged
    pub strict: bool,
    /// Maximum violation entries kept (newest retained)
    pub violation_report_cap: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            strict: false,
            violation_report_cap: DEFAULT_VIOLATION_REPORT_CAP,
        }
    }
}

impl ReportConfig {
    /// Create a new report config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set strict mode
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set the violation cap
    #[must_use]
    pub fn with_cap(mut self, cap: usize) -> Self {
        self.violation_report_cap = cap;
        self
    }
}

/// What happens to a record after it has been reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Forward unchanged
    Forward,
    /// Forward with an advisory validation annotation
    Flag,
    /// Exclude from output (strict mode, invalid record)
    Drop,
}

/// Counters for one kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindStats {
    /// Records validated
    pub seen: usize,
    /// Records with no violation and a checked (or absent) relationship
    pub valid: usize,
    /// Records with at least one violation
    pub invalid: usize,
    /// Records with no violation whose relationship was not checked
    pub unverified: usize,
    /// Records the stream filter left out before validation
    pub filtered: usize,
    /// Invalid records excluded by strict mode
    pub dropped: usize,
}

/// One retained violation sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViolationEntry {
    /// Kind of the offending record
    pub kind: EntityKind,
    /// Raw `id` of the record (`null` when absent)
    pub record_id: Value,
    /// Violation codes, in rule order
    pub reasons: Vec<ViolationCode>,
    /// Violation messages, in rule order
    pub messages: Vec<String>,
}

/// End-of-run readout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Whether strict mode was on
    pub strict: bool,
    /// Counters by stream name
    pub streams: BTreeMap<String, KindStats>,
    /// Records validated across all kinds
    pub total_seen: usize,
    /// Invalid records across all kinds
    pub total_invalid: usize,
    /// Individual violations across all kinds
    pub total_violations: usize,
    /// Percentage of validated records that were not invalid
    pub validity_rate: f64,
    /// Violation counts by code
    pub error_types: BTreeMap<ViolationCode, usize>,
    /// Most recent violation entries
    pub samples: Vec<ViolationEntry>,
    /// Entries evicted because of the cap
    pub evicted_samples: usize,
}
