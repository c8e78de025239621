//! Stream catalog
//!
//! JSON schemas of the three collections and the catalog printed by
//! `discover`. Only full refresh is supported.

use super::types::EntityKind;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Discovered catalog (available streams)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Available streams
    pub streams: Vec<CatalogStream>,
}

/// Stream in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogStream {
    /// Stream name
    pub name: String,

    /// JSON schema for the stream
    pub json_schema: Value,

    /// Supported sync modes
    pub supported_sync_modes: Vec<String>,

    /// Source-defined primary key
    pub source_defined_primary_key: Vec<Vec<String>>,
}

impl CatalogStream {
    /// Build the catalog entry for one kind
    pub fn for_kind(kind: EntityKind) -> Self {
        Self {
            name: kind.stream_name().to_string(),
            json_schema: json_schema(kind),
            supported_sync_modes: vec!["full_refresh".to_string()],
            source_defined_primary_key: kind
                .primary_key()
                .iter()
                .map(|k| vec![(*k).to_string()])
                .collect(),
        }
    }
}

impl Catalog {
    /// Catalog of every stream the tap can extract
    pub fn discover() -> Self {
        Self::for_kinds(&EntityKind::ALL)
    }

    /// Catalog restricted to the given kinds
    pub fn for_kinds(kinds: &[EntityKind]) -> Self {
        Self {
            streams: kinds.iter().map(|k| CatalogStream::for_kind(*k)).collect(),
        }
    }

    /// Find a stream by name
    pub fn stream(&self, name: &str) -> Option<&CatalogStream> {
        self.streams.iter().find(|s| s.name == name)
    }
}

fn string() -> Value {
    json!({ "type": ["string", "null"] })
}

fn integer() -> Value {
    json!({ "type": ["integer", "null"] })
}

/// JSON schema of a stream's records
pub fn json_schema(kind: EntityKind) -> Value {
    let properties = match kind {
        EntityKind::User => json!({
            "id": integer(),
            "name": string(),
            "username": string(),
            "email": string(),
            "address": {
                "type": ["object", "null"],
                "properties": {
                    "street": string(),
                    "suite": string(),
                    "city": string(),
                    "zipcode": string(),
                    "geo": {
                        "type": ["object", "null"],
                        "properties": {
                            "lat": string(),
                            "lng": string()
                        }
                    }
                }
            },
            "phone": string(),
            "website": string(),
            "company": {
                "type": ["object", "null"],
                "properties": {
                    "name": string(),
                    "catchPhrase": string(),
                    "bs": string()
                }
            }
        }),
        EntityKind::Post => json!({
            "userId": integer(),
            "id": integer(),
            "title": string(),
            "body": string()
        }),
        EntityKind::Comment => json!({
            "postId": integer(),
            "id": integer(),
            "name": string(),
            "email": string(),
            "body": string()
        }),
    };

    json!({
        "type": "object",
        "properties": properties
    })
}
