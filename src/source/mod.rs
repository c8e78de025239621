//! Record source module
//!
//! Supplies raw records for each entity kind, one page at a time.
//!
//! # Overview
//!
//! - [`RecordSource`] - the seam between the sync engine and where records come from
//! - [`RestSource`] - reads the `/users`, `/posts` and `/comments` collections over HTTP
//! - [`MemorySource`] - serves in-memory collections (fixtures, replayed tap output)
//!
//! A source failure is fatal for the run: the engine propagates it unchanged.

mod memory;
mod rest;

pub use memory::MemorySource;
pub use rest::RestSource;

use crate::error::Result;
use crate::pagination::PaginationState;
use crate::stream::{EntityKind, Record};
use async_trait::async_trait;

/// Supplier of raw records
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch the next page of `kind`
    ///
    /// Returns `None` once the collection is exhausted. `state` belongs to the
    /// caller and must start fresh for every pass over a collection.
    async fn fetch_page(
        &self,
        kind: EntityKind,
        state: &mut PaginationState,
    ) -> Result<Option<Vec<Record>>>;

    /// Whether the source holds a collection for `kind` at all
    ///
    /// An absent collection is not the same as an empty one: references into
    /// it cannot be checked. The API always serves every collection.
    fn has_collection(&self, _kind: EntityKind) -> bool {
        true
    }
}
