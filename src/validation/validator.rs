//! Record validator
//!
//! Runs the rule set of a record's kind and collects every failure.

use super::rules::{default_rules, Rule};
use super::types::{KnownPostIds, Verdict};
use crate::stream::{EntityKind, Record};
use std::collections::HashMap;

/// Validates records against per-kind rule sets
///
/// Stateless between calls: validating the same record with the same known
/// post IDs always yields the same verdict.
#[derive(Debug, Clone)]
pub struct RecordValidator {
    rules: HashMap<EntityKind, Vec<Rule>>,
}

impl Default for RecordValidator {
    fn default() -> Self {
        Self {
            rules: EntityKind::ALL
                .into_iter()
                .map(|kind| (kind, default_rules(kind)))
                .collect(),
        }
    }
}

impl RecordValidator {
    /// Create a validator with the default rule sets
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the rule set of one kind
    #[must_use]
    pub fn with_rules(mut self, kind: EntityKind, rules: Vec<Rule>) -> Self {
        self.rules.insert(kind, rules);
        self
    }

    /// Replace rule sets from a configuration override map
    #[must_use]
    pub fn with_overrides<'a>(
        mut self,
        overrides: impl IntoIterator<Item = (&'a EntityKind, &'a Vec<Rule>)>,
    ) -> Self {
        for (kind, rules) in overrides {
            self.rules.insert(*kind, rules.clone());
        }
        self
    }

    /// Rule set of a kind
    pub fn rules(&self, kind: EntityKind) -> &[Rule] {
        self.rules.get(&kind).map_or(&[][..], Vec::as_slice)
    }

    /// Validate a record
    ///
    /// Every rule runs, even after an earlier failure. `known_posts` is the set
    /// of post IDs seen so far; `None` means posts have not been fetched and
    /// relationship checks report `Unchecked`.
    pub fn validate(&self, record: &Record, known_posts: Option<&KnownPostIds>) -> Verdict {
        let mut verdict = Verdict::default();
        for rule in self.rules(record.kind()) {
            rule.apply(record, known_posts, &mut verdict);
        }
        verdict
    }
}
