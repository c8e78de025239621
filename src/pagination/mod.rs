//! Pagination module
//!
//! Supports: single request, page number (`_page`/`_limit`)
//!
//! # Overview
//!
//! Each strategy computes the query parameters of the next page from the
//! previous response and tracks when the collection is exhausted. The REST
//! source sends the query of each [`NextPage::Continue`] as its next request
//! and stops at [`NextPage::Done`].

mod strategies;
mod types;

pub use strategies::{NoPaginator, PageNumberPaginator, TOTAL_COUNT_HEADER};
pub use types::{
    check_stop_condition, NextPage, PaginationState, Paginator, StopCondition, StopResult,
};
