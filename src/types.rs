//! Common types used throughout the tap
//!
//! Shared type aliases and small enums used across multiple modules.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Parity
// ============================================================================

/// Parity of an integer key, used by the stream filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parity {
    /// Only even keys
    #[default]
    Even,
    /// Only odd keys
    Odd,
    /// Any key
    Any,
}

impl Parity {
    /// Check whether `value` has this parity
    pub fn matches(self, value: i128) -> bool {
        match self {
            Parity::Even => value % 2 == 0,
            Parity::Odd => value % 2 != 0,
            Parity::Any => true,
        }
    }
}

impl std::str::FromStr for Parity {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "even" => Ok(Parity::Even),
            "odd" => Ok(Parity::Odd),
            "any" | "none" => Ok(Parity::Any),
            other => Err(crate::Error::invalid_value(
                "post_id_parity",
                format!("expected even, odd or any, got '{other}'"),
            )),
        }
    }
}
