//! Stream filter
//!
//! Decides which records are forwarded at all. Filtering never looks at
//! validity: an invalid post with an even id is still forwarded, a valid one
//! with an odd id is still skipped.

use crate::stream::{EntityKind, Record};
use crate::types::Parity;
use serde::{Deserialize, Serialize};

/// Filter parameters read from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Parity of the post id a post or comment must reference
    #[serde(default)]
    pub post_id_parity: Parity,
}

/// Per-record filter outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    /// Send the record downstream
    Forward,
    /// Leave the record out
    Skip,
}

impl FilterDecision {
    /// Check if the record is forwarded
    pub fn is_forward(self) -> bool {
        matches!(self, Self::Forward)
    }
}

/// Selects records by the parity of the post they belong to
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamFilter {
    parity: Parity,
}

impl StreamFilter {
    /// Create a filter with the given post id parity
    pub fn new(parity: Parity) -> Self {
        Self { parity }
    }

    /// Filter that forwards everything
    pub fn allow_all() -> Self {
        Self::new(Parity::Any)
    }

    /// Create a filter from configuration
    pub fn from_config(config: &FilterConfig) -> Self {
        Self::new(config.post_id_parity)
    }

    /// Configured parity
    pub fn parity(&self) -> Parity {
        self.parity
    }

    /// Field holding the post id for a kind, if the kind is post-derived
    fn post_key(kind: EntityKind) -> Option<&'static str> {
        match kind {
            EntityKind::User => None,
            EntityKind::Post => Some("id"),
            EntityKind::Comment => Some("postId"),
        }
    }

    /// Decide whether a record is forwarded
    ///
    /// A post-derived record whose key is not an integer has no parity and is
    /// only forwarded when any parity is accepted.
    pub fn decide(&self, record: &Record) -> FilterDecision {
        if self.parity == Parity::Any {
            return FilterDecision::Forward;
        }
        let Some(key) = Self::post_key(record.kind()) else {
            return FilterDecision::Forward;
        };
        let post_id = record
            .get(key)
            .and_then(|v| v.as_i64().map(i128::from).or_else(|| v.as_u64().map(i128::from)));
        match post_id {
            Some(post_id) if self.parity.matches(post_id) => FilterDecision::Forward,
            _ => FilterDecision::Skip,
        }
    }
}
