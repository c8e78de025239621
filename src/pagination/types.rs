//! Pagination types and traits
//!
//! Defines the core pagination abstractions used by all strategies.

use reqwest::header::HeaderMap;
use std::collections::HashMap;

/// Result of the next page computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// More pages available with these parameters
    Continue {
        /// Query parameters to add/replace
        query_params: HashMap<String, String>,
    },
    /// No more pages
    Done,
}

impl NextPage {
    /// Create a continuation with query parameters
    pub fn with_params(params: HashMap<String, String>) -> Self {
        Self::Continue {
            query_params: params,
        }
    }

}

/// Stop conditions for pagination
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StopCondition {
    /// Stop when page is empty (no records)
    #[default]
    EmptyPage,

    /// Stop when the records fetched so far reach the count in a response header
    ///
    /// A missing or unparsable header falls back to the empty-page check.
    TotalCountHeader {
        /// Header carrying the collection size (e.g. `x-total-count`)
        header: String,
    },
}

impl StopCondition {
    /// Create a total count header stop condition
    pub fn total_count_header(header: impl Into<String>) -> Self {
        Self::TotalCountHeader {
            header: header.into(),
        }
    }
}

/// Result of checking a stop condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopResult {
    /// Continue pagination
    Continue,
    /// Stop pagination
    Stop,
}

impl StopResult {
    /// Check if we should stop
    pub fn should_stop(&self) -> bool {
        matches!(self, Self::Stop)
    }
}

/// Tracks pagination state while reading one collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationState {
    /// Current page number (0 until the first page is requested)
    pub page: u32,
    /// Total records fetched so far
    pub total_fetched: u64,
    /// Is pagination complete?
    pub done: bool,
    /// Query of the next request, set from the last [`NextPage::Continue`]
    pub next_params: Option<HashMap<String, String>>,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        self.done = true;
    }

    /// Increment page number
    pub fn next_page(&mut self) {
        self.page += 1;
    }

    /// Add to total fetched
    pub fn add_fetched(&mut self, count: u64) {
        self.total_fetched += count;
    }
}

/// Core trait for pagination strategies
pub trait Paginator: Send + Sync {
    /// Get query parameters of the first request
    fn initial_params(&self, state: &PaginationState) -> HashMap<String, String>;

    /// Process a response and determine if there's a next page
    fn process_response(
        &self,
        headers: &HeaderMap,
        records_count: usize,
        state: &mut PaginationState,
    ) -> NextPage;
}

/// Check a stop condition against a response
pub fn check_stop_condition(
    condition: &StopCondition,
    headers: &HeaderMap,
    records_count: usize,
    state: &PaginationState,
) -> StopResult {
    if records_count == 0 {
        return StopResult::Stop;
    }

    match condition {
        StopCondition::EmptyPage => StopResult::Continue,
        StopCondition::TotalCountHeader { header } => {
            let total = headers
                .get(header.as_str())
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok());
            match total {
                Some(total) if state.total_fetched >= total => StopResult::Stop,
                _ => StopResult::Continue,
            }
        }
    }
}
