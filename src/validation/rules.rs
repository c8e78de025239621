//! Rule registry
//!
//! Named rules, each bound to one field. Rule sets are plain `Vec<Rule>`
//! evaluated in declaration order, and can be overridden from the
//! configuration file:
//!
//! ```yaml
//! rules:
//!   post:
//!     - rule: positive_integer
//!       field: id
//!     - rule: min_length
//!       field: body
//!       min: 20
//! ```

use super::fields;
use super::types::{
    FieldCheck, KnownPostIds, RelationshipStatus, Verdict, Violation, ViolationCode,
};
use crate::stream::{EntityKind, Record};
use serde::{Deserialize, Serialize};

/// Minimum body length for posts and comments
pub const MIN_BODY_LENGTH: usize = 10;

/// A named validation rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Rule {
    /// Integer >= 1
    PositiveInteger { field: String },
    /// `local@domain.tld` address
    EmailFormat { field: String },
    /// At least `min` characters
    MinLength { field: String, min: usize },
    /// Not every letter upper-case
    NotAllUppercase { field: String },
    /// Mapping with at least one entry
    NonEmptyMapping { field: String },
    /// Positive integer naming a post seen in this run
    ReferencesPost { field: String },
}

impl Rule {
    /// Registry name of the rule
    pub fn name(&self) -> &'static str {
        match self {
            Rule::PositiveInteger { .. } => "positive_integer",
            Rule::EmailFormat { .. } => "email_format",
            Rule::MinLength { .. } => "min_length",
            Rule::NotAllUppercase { .. } => "not_all_uppercase",
            Rule::NonEmptyMapping { .. } => "non_empty_mapping",
            Rule::ReferencesPost { .. } => "references_post",
        }
    }

    /// Field the rule inspects
    pub fn field(&self) -> &str {
        match self {
            Rule::PositiveInteger { field }
            | Rule::EmailFormat { field }
            | Rule::MinLength { field, .. }
            | Rule::NotAllUppercase { field }
            | Rule::NonEmptyMapping { field }
            | Rule::ReferencesPost { field } => field,
        }
    }

    /// Apply the rule to a record, appending to `verdict`
    pub fn apply(&self, record: &Record, known_posts: Option<&KnownPostIds>, verdict: &mut Verdict) {
        let field = self.field();
        let value = record.get(field);

        let result = match self {
            Rule::PositiveInteger { .. } => fields::positive_integer(value, field),
            Rule::EmailFormat { .. } => fields::email_format(value, field),
            Rule::MinLength { min, .. } => fields::min_length(value, field, *min),
            Rule::NotAllUppercase { .. } => fields::not_all_uppercase(value, field),
            Rule::NonEmptyMapping { .. } => fields::non_empty_mapping(value, field),
            Rule::ReferencesPost { .. } => {
                let (status, result) = check_reference(value, field, known_posts);
                verdict.relationship = status;
                result
            }
        };

        if let Err(violation) = result {
            verdict.violations.push(violation);
        }
    }

    fn positive(field: &str) -> Self {
        Rule::PositiveInteger {
            field: field.to_string(),
        }
    }
}

fn check_reference(
    value: Option<&serde_json::Value>,
    field: &str,
    known_posts: Option<&KnownPostIds>,
) -> (RelationshipStatus, FieldCheck) {
    let post_id = match fields::positive_id(value, field) {
        Ok(id) => id,
        Err(violation) => return (RelationshipStatus::Failed, Err(violation)),
    };

    match known_posts {
        None => (RelationshipStatus::Unchecked, Ok(())),
        Some(known) if known.contains(&post_id) => (RelationshipStatus::Verified, Ok(())),
        Some(_) => (
            RelationshipStatus::Failed,
            Err(Violation::new(
                ViolationCode::UnknownPost,
                field,
                format!("Post {post_id} referenced by {field} was not seen in this run"),
            )),
        ),
    }
}

/// Default rule set for a kind
pub fn default_rules(kind: EntityKind) -> Vec<Rule> {
    match kind {
        EntityKind::User => vec![
            Rule::positive("id"),
            Rule::EmailFormat {
                field: "email".to_string(),
            },
            Rule::NonEmptyMapping {
                field: "address".to_string(),
            },
        ],
        EntityKind::Post => vec![
            Rule::positive("id"),
            Rule::positive("userId"),
            Rule::NotAllUppercase {
                field: "title".to_string(),
            },
            Rule::MinLength {
                field: "body".to_string(),
                min: MIN_BODY_LENGTH,
            },
        ],
        EntityKind::Comment => vec![
            Rule::positive("id"),
            Rule::MinLength {
                field: "body".to_string(),
                min: MIN_BODY_LENGTH,
            },
            Rule::ReferencesPost {
                field: "postId".to_string(),
            },
        ],
    }
}
