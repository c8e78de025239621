//! Stream module
//!
//! The three collections the tap extracts, their records and their catalog.
//!
//! # Overview
//!
//! - `EntityKind` - user, post or comment, with the stream name and endpoint
//! - `Record` - one fetched item, an immutable field map tagged with its kind
//! - `Catalog` - stream declarations (schema, primary key) printed by `discover`

mod catalog;
mod types;

pub use catalog::{json_schema, Catalog, CatalogStream};
pub use types::{EntityKind, Record};
pub(crate) use types::json_type_name;
