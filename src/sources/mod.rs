//! Paper index clients.
//!
//! A [`Source`] executes one logical search and returns the matching
//! papers in the index's order. Paging, pacing and retries are the
//! source's own business; callers issue a single `search` and await it.
//!
//! [`ArxivSource`] talks to the public arXiv API. [`MockSource`] returns
//! canned papers and is used by the test suite.

mod arxiv;
pub mod mock;

pub use arxiv::{ArxivSource, ARXIV_API_URL, PAGE_SIZE};
pub use mock::MockSource;

use crate::models::{FetchRequest, Paper};
use async_trait::async_trait;
use std::error::Error as _;

/// Receives progress notifications while a search streams in.
///
/// Implementations only observe; they cannot influence ordering or
/// filtering.
pub trait FetchProgress: Send + Sync {
    /// `count` more records have arrived
    fn advance(&self, count: usize);
}

/// Progress sink that ignores every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl FetchProgress for NoProgress {
    fn advance(&self, _count: usize) {}
}

/// The Source trait defines the interface for paper index clients.
#[async_trait]
pub trait Source: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this source (e.g. "arxiv")
    fn id(&self) -> &str;

    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Run `request` and return up to `request.max_results` papers.
    async fn search(
        &self,
        request: &FetchRequest,
        progress: &dyn FetchProgress,
    ) -> Result<Vec<Paper>, SourceError>;
}

/// Errors that can occur when interacting with a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// TLS handshake or certificate validation failed
    #[error("Certificate error: {0}")]
    Certificate(String),

    /// Parsing error (Atom, JSON)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimit,

    /// API error from the source
    #[error("API error: {0}")]
    Api(String),

    /// Other error
    #[error("Error: {0}")]
    Other(String),
}

impl SourceError {
    /// Whether the failure points at TLS/certificate trouble
    pub fn is_certificate(&self) -> bool {
        matches!(self, SourceError::Certificate(_))
    }
}

/// Words that show up in TLS failures across native-tls, openssl and rustls.
const TLS_MARKERS: [&str; 5] = ["certificate", "ssl", "tls", "handshake", "unknownissuer"];

/// Walk an error chain looking for a TLS/certificate cause.
pub fn is_certificate_failure(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        let text = e.to_string().to_lowercase();
        if TLS_MARKERS.iter().any(|marker| text.contains(marker)) {
            return true;
        }
        current = e.source();
    }
    false
}

/// Render an error with its full cause chain on one line.
fn chain_message(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut current = err.source();
    while let Some(e) = current {
        message.push_str(": ");
        message.push_str(&e.to_string());
        current = e.source();
    }
    message
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        // The top-level message embeds the request URL, so only causes are inspected
        if err.source().is_some_and(is_certificate_failure) {
            return SourceError::Certificate(chain_message(&err));
        }
        if err.status() == Some(reqwest::StatusCode::TOO_MANY_REQUESTS) {
            return SourceError::RateLimit;
        }
        if err.is_decode() {
            return SourceError::Parse(chain_message(&err));
        }
        SourceError::Network(chain_message(&err))
    }
}

impl From<feed_rs::parser::ParseFeedError> for SourceError {
    fn from(err: feed_rs::parser::ParseFeedError) -> Self {
        SourceError::Parse(format!("Atom: {}", err))
    }
}
