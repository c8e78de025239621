//! HTTP client module
//!
//! Provides the HTTP client used by the REST record source.
//!
//! # Features
//!
//! - **Base URL resolution**: relative paths resolve against the API root
//! - **JSON only**: every request asks for `application/json`
//! - **Error classification**: 4xx/5xx, timeouts and transport failures map to
//!   distinct errors

mod client;

pub use client::{
    CollectionResponse, HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig,
};
