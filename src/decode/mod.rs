//! Response decoder module
//!
//! Supports: JSON, JSONL
//!
//! # Overview
//!
//! Decoders turn a response body (or a replay file) into a list of raw JSON
//! values. The JSON decoder can pull the record list out of an envelope with
//! a dot-notation path.

mod decoders;
mod types;

pub use decoders::{JsonDecoder, JsonlDecoder};
pub use types::RecordDecoder;

#[cfg(test)]
mod tests;
