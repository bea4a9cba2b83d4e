// Core structs: ListingRecord, AggregateResult, NormalizedQuery
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

pub const CONTACT_VENDOR: &str = "Contact vendor";
pub const PRICE_NOT_AVAILABLE: &str = "Price not available";

/// One candidate offer for a piece of equipment, as found by a probe or
/// produced by the fallback synthesizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingRecord {
    pub brand: String,
    pub model: String,
    pub price: String,
    pub vendor: String,
    pub web_url: String,
    pub qty_available: String,
    pub source: String,
}

impl ListingRecord {
    /// Numeric value of a `$1234.56` price, `None` for the placeholder strings.
    pub fn price_value(&self) -> Option<f64> {
        self.price.strip_prefix('$')?.replace(',', "").parse().ok()
    }
}

/// Formats a price the way every listing displays it.
pub fn format_price(value: f64) -> String {
    format!("${:.2}", value)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub search_results: Vec<ListingRecord>,
    pub total_found: usize,
    pub sources: BTreeMap<String, usize>,
}

impl AggregateResult {
    /// Appends records and tallies them under their `source`.
    pub fn extend(&mut self, records: Vec<ListingRecord>) {
        for record in records {
            *self.sources.entry(record.source.clone()).or_insert(0) += 1;
            self.search_results.push(record);
        }
        self.total_found = self.search_results.len();
    }

    pub fn is_empty(&self) -> bool {
        self.search_results.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedQuery {
    pub brand: String,
    pub model: String,
    pub options: Vec<String>,
}

/// Output of a normalizer: the structured query plus any free-form results
/// the normalizer chose to attach.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizerPayload {
    pub normalized: NormalizedQuery,
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http error: {0}")]
    Http(String),
    #[error("request timed out")]
    Timeout,
    #[error("unexpected status {0}")]
    Status(u16),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Http(e.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config value: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("normalizer unavailable: {0}")]
    Unavailable(String),
    #[error("malformed normalizer response: {0}")]
    Malformed(String),
}
