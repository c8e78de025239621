//! Stream types
//!
//! Entity kinds and the record wrapper shared by the source, the validator
//! and the output.

use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of entity a record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// A user account
    User,
    /// A post written by a user
    Post,
    /// A comment on a post
    Comment,
}

impl EntityKind {
    /// All kinds in extraction order (posts before comments)
    pub const ALL: [EntityKind; 3] = [EntityKind::User, EntityKind::Post, EntityKind::Comment];

    /// Stream name used in output messages
    pub fn stream_name(self) -> &'static str {
        match self {
            EntityKind::User => "users",
            EntityKind::Post => "posts",
            EntityKind::Comment => "comments",
        }
    }

    /// API endpoint path of the collection
    pub fn path(self) -> &'static str {
        match self {
            EntityKind::User => "/users",
            EntityKind::Post => "/posts",
            EntityKind::Comment => "/comments",
        }
    }

    /// Primary key fields
    pub fn primary_key(self) -> &'static [&'static str] {
        &["id"]
    }

    /// Look up a kind by stream name (`posts`) or kind name (`post`)
    pub fn from_stream_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "users" | "user" => Some(EntityKind::User),
            "posts" | "post" => Some(EntityKind::Post),
            "comments" | "comment" => Some(EntityKind::Comment),
            _ => None,
        }
    }

    /// Parse a comma-separated stream list; an empty list selects every kind
    pub fn parse_list(list: &str) -> Result<Vec<Self>> {
        let mut kinds = Vec::new();
        for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let kind = Self::from_stream_name(name).ok_or_else(|| Error::stream_not_found(name))?;
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        if kinds.is_empty() {
            kinds.extend(Self::ALL);
        }
        Ok(kinds)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::User => "user",
            EntityKind::Post => "post",
            EntityKind::Comment => "comment",
        };
        f.write_str(name)
    }
}

impl FromStr for EntityKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_stream_name(s).ok_or_else(|| Error::stream_not_found(s))
    }
}

/// One fetched record
///
/// The field map is never mutated after construction; validation only reads
/// it and output only annotates alongside it.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    kind: EntityKind,
    fields: JsonObject,
}

impl Record {
    /// Create a record from a field map
    pub fn new(kind: EntityKind, fields: JsonObject) -> Self {
        Self { kind, fields }
    }

    /// Create a record from a JSON value, which must be an object
    pub fn from_value(kind: EntityKind, value: JsonValue) -> Result<Self> {
        match value {
            JsonValue::Object(fields) => Ok(Self::new(kind, fields)),
            other => Err(Error::decode(format!(
                "expected a {kind} object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Kind of this record
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Get a field value
    pub fn get(&self, field: &str) -> Option<&JsonValue> {
        self.fields.get(field)
    }

    /// Raw `id` value, `Null` when absent
    pub fn id_value(&self) -> JsonValue {
        self.fields.get("id").cloned().unwrap_or(JsonValue::Null)
    }

    /// Integer value of a field, if it holds one
    pub fn integer(&self, field: &str) -> Option<i64> {
        self.fields.get(field).and_then(JsonValue::as_i64)
    }

    /// Borrow the field map
    pub fn fields(&self) -> &JsonObject {
        &self.fields
    }

    /// Consume the record, returning the field map
    pub fn into_fields(self) -> JsonObject {
        self.fields
    }
}

/// Human-readable JSON type name
pub(crate) fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
