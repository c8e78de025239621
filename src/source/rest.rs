//! HTTP-backed record source

use super::RecordSource;
use crate::decode::{JsonDecoder, RecordDecoder};
use crate::error::Result;
use crate::http::{HttpClient, RequestConfig};
use crate::pagination::{NextPage, NoPaginator, PageNumberPaginator, PaginationState, Paginator};
use crate::stream::{EntityKind, Record};
use async_trait::async_trait;
use tracing::debug;

/// Reads entity collections from the REST API
pub struct RestSource {
    client: HttpClient,
    paginator: Box<dyn Paginator>,
    decoder: Box<dyn RecordDecoder>,
}

impl RestSource {
    /// Create a source that fetches each collection in a single request
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            paginator: Box::new(NoPaginator),
            decoder: Box::new(JsonDecoder::new()),
        }
    }

    /// Page through collections with `_page`/`_limit`
    #[must_use]
    pub fn with_page_size(self, page_size: Option<u32>) -> Self {
        match page_size {
            Some(size) => self.with_paginator(PageNumberPaginator::json_server(size)),
            None => self.with_paginator(NoPaginator),
        }
    }

    /// Use a custom paginator
    #[must_use]
    pub fn with_paginator(mut self, paginator: impl Paginator + 'static) -> Self {
        self.paginator = Box::new(paginator);
        self
    }
}

#[async_trait]
impl RecordSource for RestSource {
    async fn fetch_page(
        &self,
        kind: EntityKind,
        state: &mut PaginationState,
    ) -> Result<Option<Vec<Record>>> {
        if state.done {
            return Ok(None);
        }

        let params = state
            .next_params
            .take()
            .unwrap_or_else(|| self.paginator.initial_params(state));
        let response = self
            .client
            .get_collection(kind.path(), RequestConfig::new().queries(params))
            .await?;

        let records = self
            .decoder
            .decode(&response.body)?
            .into_iter()
            .map(|value| Record::from_value(kind, value))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "Fetched {} {} (page {})",
            records.len(),
            kind.stream_name(),
            state.page
        );

        match self
            .paginator
            .process_response(&response.headers, records.len(), state)
        {
            NextPage::Continue { query_params } => state.next_params = Some(query_params),
            NextPage::Done => state.mark_done(),
        }
        Ok(Some(records))
    }
}

impl std::fmt::Debug for RestSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestSource")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}
