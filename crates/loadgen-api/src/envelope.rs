//! Uniform result envelopes. Every facet response passes through one of
//! these so structured (de)serialization cost is always incurred, like a
//! production API payload would.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StringResult {
    pub result: String,
}

impl StringResult {
    pub fn new(result: impl Into<String>) -> Self {
        Self { result: result.into() }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NumberResult {
    pub result: i64,
}

impl NumberResult {
    pub fn new(result: i64) -> Self {
        Self { result }
    }
}

/// Wraps an upstream response: its status code plus the decoded body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResult<T> {
    pub status: i64,
    pub result: T,
}

/// Decoded body of a proxied facet response, one variant per result shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FacetBody {
    Number(NumberResult),
    Text(StringResult),
    Status(StatusResult<serde_json::Value>),
    Opaque(serde_json::Value),
}
