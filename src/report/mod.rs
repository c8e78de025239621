//! Validation reporting
//!
//! Aggregates per-record verdicts into run-level counters and a bounded list
//! of violation samples, and applies the strict/advisory policy.

mod reporter;
mod types;

pub use reporter::ValidationReport;
pub use types::{
    Disposition, KindStats, ReportConfig, ReportSummary, ViolationEntry,
    DEFAULT_VIOLATION_REPORT_CAP,
};
