//! Validation report accumulator
//!
//! One `ValidationReport` per run: created when the run starts, fed once per
//! record, read out with [`ValidationReport::summary`] when it ends. It is
//! passed around explicitly; there is no global report.

use super::types::{Disposition, KindStats, ReportConfig, ReportSummary, ViolationEntry};
use crate::stream::{EntityKind, Record};
use crate::validation::{Verdict, VerdictStatus, ViolationCode};
use std::collections::{BTreeMap, VecDeque};

/// Run-scoped validation statistics
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    config: ReportConfig,
    kinds: BTreeMap<EntityKind, KindStats>,
    violations: VecDeque<ViolationEntry>,
    evicted: usize,
    total_violations: usize,
    error_types: BTreeMap<ViolationCode, usize>,
}

impl ValidationReport {
    /// Start a report for a new run
    pub fn new(config: ReportConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Counters for one kind
    pub fn stats(&self, kind: EntityKind) -> KindStats {
        self.kinds.get(&kind).copied().unwrap_or_default()
    }

    /// Retained violation entries, oldest first
    pub fn violations(&self) -> impl Iterator<Item = &ViolationEntry> {
        self.violations.iter()
    }

    /// Count a record the stream filter left out
    pub fn record_filtered(&mut self, kind: EntityKind) {
        self.kinds.entry(kind).or_default().filtered += 1;
    }

    /// Account for one validated record and decide what happens to it
    pub fn record(&mut self, record: &Record, verdict: &Verdict) -> Disposition {
        let kind = record.kind();
        let status = verdict.status();
        let stats = self.kinds.entry(kind).or_default();
        stats.seen += 1;

        match status {
            VerdictStatus::Valid => {
                stats.valid += 1;
                return Disposition::Forward;
            }
            VerdictStatus::Unverified => {
                stats.unverified += 1;
                return Disposition::Flag;
            }
            VerdictStatus::Invalid => {
                stats.invalid += 1;
            }
        }

        let disposition = if self.config.strict {
            stats.dropped += 1;
            Disposition::Drop
        } else {
            Disposition::Flag
        };

        self.total_violations += verdict.violations.len();
        for code in verdict.codes() {
            *self.error_types.entry(code).or_default() += 1;
        }
        self.push_entry(ViolationEntry {
            kind,
            record_id: record.id_value(),
            reasons: verdict.codes(),
            messages: verdict.violations.iter().map(ToString::to_string).collect(),
        });

        disposition
    }

    fn push_entry(&mut self, entry: ViolationEntry) {
        if self.config.violation_report_cap == 0 {
            self.evicted += 1;
            return;
        }
        if self.violations.len() == self.config.violation_report_cap {
            self.violations.pop_front();
            self.evicted += 1;
        }
        self.violations.push_back(entry);
    }

    /// Merge a partial report produced elsewhere into this one
    ///
    /// Counters add up exactly; retained samples from `other` are appended
    /// after this report's, subject to the cap.
    pub fn merge(&mut self, other: ValidationReport) {
        for (kind, theirs) in other.kinds {
            let ours = self.kinds.entry(kind).or_default();
            ours.seen += theirs.seen;
            ours.valid += theirs.valid;
            ours.invalid += theirs.invalid;
            ours.unverified += theirs.unverified;
            ours.filtered += theirs.filtered;
            ours.dropped += theirs.dropped;
        }
        for (code, count) in other.error_types {
            *self.error_types.entry(code).or_default() += count;
        }
        self.total_violations += other.total_violations;
        self.evicted += other.evicted;
        for entry in other.violations {
            self.push_entry(entry);
        }
    }

    /// End-of-run readout
    pub fn summary(&self) -> ReportSummary {
        let total_seen: usize = self.kinds.values().map(|s| s.seen).sum();
        let total_invalid: usize = self.kinds.values().map(|s| s.invalid).sum();
        let validity_rate = if total_seen > 0 {
            (total_seen - total_invalid) as f64 / total_seen as f64 * 100.0
        } else {
            0.0
        };

        ReportSummary {
            strict: self.config.strict,
            streams: self
                .kinds
                .iter()
                .map(|(kind, stats)| (kind.stream_name().to_string(), *stats))
                .collect(),
            total_seen,
            total_invalid,
            total_violations: self.total_violations,
            validity_rate,
            error_types: self.error_types.clone(),
            samples: self.violations.iter().cloned().collect(),
            evicted_samples: self.evicted,
        }
    }
}
