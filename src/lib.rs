#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::unused_self)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::unused_async)]

//! # tap-jsonplaceholder
//!
//! A validating extractor for the JSONPlaceholder demo API.
//!
//! ## Features
//!
//! - **Extraction**: users, posts and comments over REST, paged or whole
//! - **Filtering**: posts and comments are forwarded by post id parity
//! - **Validation**: per-field rules plus a comment to post relationship check
//! - **Reporting**: strict mode drops invalid records, advisory mode flags them
//! - **Replay**: captured output can be re-validated or analyzed offline
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tap_jsonplaceholder::config::TapConfig;
//! use tap_jsonplaceholder::engine::{Message, SyncEngine};
//! use tap_jsonplaceholder::http::HttpClient;
//! use tap_jsonplaceholder::source::RestSource;
//! use tap_jsonplaceholder::stream::EntityKind;
//!
//! #[tokio::main]
//! async fn main() -> tap_jsonplaceholder::Result<()> {
//!     let config = TapConfig::default();
//!     let client = HttpClient::with_config(config.http_client_config())?;
//!
//!     let mut engine = SyncEngine::new(RestSource::new(client))
//!         .with_config(config.sync_config(0))
//!         .with_validator(config.validator())
//!         .with_filter(config.stream_filter());
//!
//!     let mut messages: Vec<Message> = Vec::new();
//!     let report = engine.run(&EntityKind::ALL, &mut messages).await?;
//!     println!("{:?}", report.summary());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  cli: spec / check / discover / read / analyze               │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │
//! ┌──────────────────────────────┴───────────────────────────────┐
//! │  engine: source → filter → validate → report → sink          │
//! └──────┬───────────┬────────────┬────────────┬─────────────────┘
//!        │           │            │            │
//! ┌──────┴─────┐ ┌───┴────┐ ┌─────┴──────┐ ┌───┴─────────┐
//! │ source     │ │ filter │ │ validation │ │ output      │
//! │ http       │ │        │ │ report     │ │ metrics     │
//! │ pagination │ │        │ │            │ │             │
//! │ decode     │ │        │ │            │ │             │
//! └────────────┘ └────────┘ └────────────┘ └─────────────┘
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the tap
pub mod error;

/// Common types and type aliases
pub mod types;

/// Entity kinds, records and the stream catalog
pub mod stream;

/// HTTP client
pub mod http;

/// Pagination strategies
pub mod pagination;

/// Response decoders (JSON, JSON lines)
pub mod decode;

/// Record sources (REST API, in-memory replay)
pub mod source;

/// Field rules and record validation
pub mod validation;

/// Post id parity filtering
pub mod filter;

/// Validation report and strict/advisory policy
pub mod report;

/// Main execution engine
pub mod engine;

/// Message output and captured output reading
pub mod output;

/// Engagement metrics
pub mod metrics;

/// Tap configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::TapConfig;
pub use engine::{Message, SyncEngine};
pub use stream::{EntityKind, Record};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
