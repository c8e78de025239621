//! In-memory record source

use super::RecordSource;
use crate::error::{Error, Result};
use crate::pagination::PaginationState;
use crate::stream::{EntityKind, Record};
use crate::types::JsonValue;
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};

/// Serves fixed collections, optionally paged
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    collections: BTreeMap<EntityKind, Vec<JsonValue>>,
    page_size: Option<usize>,
    failing: BTreeSet<EntityKind>,
}

impl MemorySource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source from per-kind collections
    pub fn from_collections(collections: BTreeMap<EntityKind, Vec<JsonValue>>) -> Self {
        Self {
            collections,
            ..Default::default()
        }
    }

    /// Set the collection for one kind
    #[must_use]
    pub fn with_records(mut self, kind: EntityKind, records: Vec<JsonValue>) -> Self {
        self.collections.insert(kind, records);
        self
    }

    /// Serve at most `size` records per page
    #[must_use]
    pub fn with_page_size(mut self, size: usize) -> Self {
        self.page_size = Some(size.max(1));
        self
    }

    /// Make every fetch of `kind` fail as if the API were unavailable
    #[must_use]
    pub fn fail_on(mut self, kind: EntityKind) -> Self {
        self.failing.insert(kind);
        self
    }

    /// Number of records held for `kind`
    pub fn record_count(&self, kind: EntityKind) -> usize {
        self.collections.get(&kind).map_or(0, Vec::len)
    }
}

#[async_trait]
impl RecordSource for MemorySource {
    async fn fetch_page(
        &self,
        kind: EntityKind,
        state: &mut PaginationState,
    ) -> Result<Option<Vec<Record>>> {
        if self.failing.contains(&kind) {
            return Err(Error::http_status(
                503,
                format!("{} unavailable", kind.stream_name()),
            ));
        }
        if state.done {
            return Ok(None);
        }

        let all = self.collections.get(&kind).map_or(&[][..], Vec::as_slice);
        let offset = usize::try_from(state.total_fetched).unwrap_or(usize::MAX);
        let remaining = all.get(offset..).unwrap_or_default();
        let take = self.page_size.unwrap_or(remaining.len()).min(remaining.len());

        let records = remaining[..take]
            .iter()
            .cloned()
            .map(|value| Record::from_value(kind, value))
            .collect::<Result<Vec<_>>>()?;

        state.next_page();
        state.add_fetched(take as u64);
        if offset + take >= all.len() {
            state.mark_done();
        }

        Ok(Some(records))
    }

    fn has_collection(&self, kind: EntityKind) -> bool {
        self.collections.contains_key(&kind)
    }
}
