//! Validation module
//!
//! Field predicates, the named rule registry and the per-kind record
//! validator.
//!
//! # Overview
//!
//! - `fields` - pure predicates over a single field value
//! - `Rule` - a named predicate bound to a field
//! - `RecordValidator` - runs a kind's rules and returns a `Verdict`
//!
//! Rule failures are values, never errors: a record with five problems gets a
//! verdict listing five violations, ordered as the rules are declared.

pub mod fields;
mod rules;
mod types;
mod validator;

pub use rules::{default_rules, Rule, MIN_BODY_LENGTH};
pub use types::{
    FieldCheck, KnownPostIds, RelationshipStatus, Verdict, VerdictStatus, Violation,
    ViolationCode,
};
pub use validator::RecordValidator;
