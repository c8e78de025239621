//! Pagination strategy implementations
//!
//! Each strategy handles a specific pagination pattern.

use super::types::{check_stop_condition, NextPage, PaginationState, Paginator, StopCondition};
use reqwest::header::HeaderMap;
use std::collections::HashMap;

/// Header the API uses to report the size of a paged collection
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

// ============================================================================
// Page Number Pagination
// ============================================================================

/// Page number pagination
///
/// Uses page number parameter to paginate.
/// Common patterns:
/// - `?_page=2&_limit=20`
/// - `?page=2&per_page=50`
#[derive(Debug, Clone)]
pub struct PageNumberPaginator {
    /// Query parameter name for page number
    pub page_param: String,
    /// First page number (usually 0 or 1)
    pub start_page: u32,
    /// Optional page size parameter name
    pub page_size_param: Option<String>,
    /// Page size value
    pub page_size: Option<u32>,
    /// Stop condition
    pub stop_condition: StopCondition,
}

impl PageNumberPaginator {
    /// Create a new page number paginator
    pub fn new(page_param: impl Into<String>, start_page: u32) -> Self {
        Self {
            page_param: page_param.into(),
            start_page,
            page_size_param: None,
            page_size: None,
            stop_condition: StopCondition::EmptyPage,
        }
    }

    /// Paginator for the `_page`/`_limit` convention, stopping on `x-total-count`
    pub fn json_server(page_size: u32) -> Self {
        Self::new("_page", 1)
            .with_page_size("_limit", page_size)
            .with_stop_condition(StopCondition::total_count_header(TOTAL_COUNT_HEADER))
    }

    /// Set page size parameter
    #[must_use]
    pub fn with_page_size(mut self, param: impl Into<String>, size: u32) -> Self {
        self.page_size_param = Some(param.into());
        self.page_size = Some(size);
        self
    }

    /// Set stop condition
    #[must_use]
    pub fn with_stop_condition(mut self, condition: StopCondition) -> Self {
        self.stop_condition = condition;
        self
    }

    fn params_for(&self, page: u32) -> HashMap<String, String> {
        let mut params = HashMap::new();
        params.insert(self.page_param.clone(), page.to_string());
        if let (Some(param), Some(size)) = (&self.page_size_param, self.page_size) {
            params.insert(param.clone(), size.to_string());
        }
        params
    }
}

impl Paginator for PageNumberPaginator {
    fn initial_params(&self, state: &PaginationState) -> HashMap<String, String> {
        let page = if state.page == 0 {
            self.start_page
        } else {
            state.page
        };
        self.params_for(page)
    }

    fn process_response(
        &self,
        headers: &HeaderMap,
        records_count: usize,
        state: &mut PaginationState,
    ) -> NextPage {
        state.add_fetched(records_count as u64);

        if check_stop_condition(&self.stop_condition, headers, records_count, state)
            .should_stop()
        {
            state.mark_done();
            return NextPage::Done;
        }

        // A short page is the last one
        if let Some(size) = self.page_size {
            if records_count < size as usize {
                state.mark_done();
                return NextPage::Done;
            }
        }

        // The first page was requested at start_page even though state.page was 0
        if state.page == 0 {
            state.page = self.start_page;
        }
        state.next_page();

        NextPage::with_params(self.params_for(state.page))
    }
}

// ============================================================================
// No Pagination
// ============================================================================

/// No pagination - single request
#[derive(Debug, Clone, Default)]
pub struct NoPaginator;

impl Paginator for NoPaginator {
    fn initial_params(&self, _state: &PaginationState) -> HashMap<String, String> {
        HashMap::new()
    }

    fn process_response(
        &self,
        _headers: &HeaderMap,
        records_count: usize,
        state: &mut PaginationState,
    ) -> NextPage {
        state.add_fetched(records_count as u64);
        state.mark_done();
        NextPage::Done
    }
}
