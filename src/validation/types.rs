//! Validation types
//!
//! Violation codes, verdicts and the relationship tri-state.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Post IDs known to exist in the current run
pub type KnownPostIds = HashSet<u64>;

/// Reason a rule failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ViolationCode {
    /// Field absent or null
    FieldMissing,
    /// Field present with the wrong JSON type
    TypeMismatch,
    /// Not an integer >= 1
    InvalidId,
    /// Not a `local@domain.tld` address
    InvalidEmail,
    /// Fewer characters than required
    TooShort,
    /// Every letter is upper-case
    AllUppercase,
    /// Empty mapping
    MissingAddress,
    /// Reference to a post that was not seen in this run
    UnknownPost,
}

impl ViolationCode {
    /// Name as it appears in reports
    pub fn as_str(self) -> &'static str {
        match self {
            ViolationCode::FieldMissing => "FieldMissing",
            ViolationCode::TypeMismatch => "TypeMismatch",
            ViolationCode::InvalidId => "InvalidId",
            ViolationCode::InvalidEmail => "InvalidEmail",
            ViolationCode::TooShort => "TooShort",
            ViolationCode::AllUppercase => "AllUppercase",
            ViolationCode::MissingAddress => "MissingAddress",
            ViolationCode::UnknownPost => "UnknownPost",
        }
    }
}

impl fmt::Display for ViolationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single failed rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Failure code
    pub code: ViolationCode,
    /// Field the rule inspected
    pub field: String,
    /// Human-readable reason
    pub message: String,
}

impl Violation {
    /// Create a new violation
    pub fn new(code: ViolationCode, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Outcome of a single field check
pub type FieldCheck = std::result::Result<(), Violation>;

/// Outcome of the comment → post relationship check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipStatus {
    /// The kind has no relationship rule
    #[default]
    NotApplicable,
    /// The referenced post was seen in this run
    Verified,
    /// No post IDs were available, so nothing was checked
    Unchecked,
    /// The reference is invalid or unknown
    Failed,
}

/// Overall status of a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictStatus {
    /// Every rule passed
    Valid,
    /// No rule failed, but the relationship check was skipped
    Unverified,
    /// At least one rule failed
    Invalid,
}

/// Validity outcome for one record
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Verdict {
    /// Failed rules, in rule declaration order
    pub violations: Vec<Violation>,
    /// Relationship check outcome
    pub relationship: RelationshipStatus,
}

impl Verdict {
    /// True when no rule failed
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// Tri-state status; a skipped relationship check is never plain `Valid`
    pub fn status(&self) -> VerdictStatus {
        if !self.violations.is_empty() {
            VerdictStatus::Invalid
        } else if self.relationship == RelationshipStatus::Unchecked {
            VerdictStatus::Unverified
        } else {
            VerdictStatus::Valid
        }
    }

    /// Violation codes in order
    pub fn codes(&self) -> Vec<ViolationCode> {
        self.violations.iter().map(|v| v.code).collect()
    }

    /// Check whether a code is present
    pub fn has(&self, code: ViolationCode) -> bool {
        self.violations.iter().any(|v| v.code == code)
    }
}
