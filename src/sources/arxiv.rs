//! arXiv research source implementation.

use async_trait::async_trait;
use feed_rs::model::Entry;
use feed_rs::parser;
use std::sync::Arc;
use std::time::Duration;

use crate::models::{FetchRequest, Paper, PaperBuilder, SortOrder};
use crate::sources::{FetchProgress, Source, SourceError};
use crate::utils::{arxiv_retry_config, collapse_whitespace, with_retry, HttpClient, RetryConfig};

/// Base URL for arXiv API
pub const ARXIV_API_URL: &str = "http://export.arxiv.org/api/query";

/// Entries requested per API call
pub const PAGE_SIZE: usize = 100;

/// Pause between consecutive page requests, per arXiv's usage policy
const PAGE_DELAY: Duration = Duration::from_secs(3);

/// Marker in the id of the entry arXiv returns instead of results when a
/// query is rejected
const ERROR_ENTRY_MARKER: &str = "/api/errors";

/// arXiv research source
///
/// Results are fetched page by page, newest submissions first, with a
/// fixed delay between pages and retries on transient failures.
#[derive(Debug, Clone)]
pub struct ArxivSource {
    client: Arc<HttpClient>,
    base_url: String,
    page_size: usize,
    page_delay: Duration,
    retry: RetryConfig,
}

impl ArxivSource {
    /// Create a new arXiv source
    pub fn new(verify_ssl: bool) -> Result<Self, SourceError> {
        Ok(Self::with_client(Arc::new(HttpClient::with_verification(
            verify_ssl,
        )?)))
    }

    /// Create with a custom HTTP client
    pub fn with_client(client: Arc<HttpClient>) -> Self {
        Self {
            client,
            base_url: ARXIV_API_URL.to_string(),
            page_size: PAGE_SIZE,
            page_delay: PAGE_DELAY,
            retry: arxiv_retry_config(),
        }
    }

    /// Point the source at another endpoint (used by tests)
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Override the page size
    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = size.clamp(1, PAGE_SIZE);
        self
    }

    /// Override the delay between pages
    pub fn page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    /// Override the retry policy
    pub fn retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Extract the identifier from an abstract URL.
    ///
    /// Everything after `/abs/` is kept, so old-style ids such as
    /// `math.GT/0104020v1` survive intact and version suffixes are preserved.
    pub fn id_from_url(url: &str) -> Option<&str> {
        let id = match url.split_once("/abs/") {
            Some((_, rest)) => rest,
            None => url.rsplit('/').next()?,
        };
        let id = id.trim_end_matches('/');
        (!id.is_empty()).then_some(id)
    }

    /// Build the request URL for one page
    fn page_url(&self, request: &FetchRequest, start: usize, size: usize) -> String {
        let (sort_by, sort_order) = match request.sort {
            SortOrder::NewestFirst => ("submittedDate", "descending"),
            SortOrder::Relevance => ("relevance", "descending"),
        };

        format!(
            "{}?search_query={}&start={}&max_results={}&sortBy={}&sortOrder={}",
            self.base_url,
            urlencoding::encode(&request.query),
            start,
            size,
            sort_by,
            sort_order
        )
    }

    /// Fetch and parse a single page
    async fn fetch_page(&self, url: &str) -> Result<Vec<Paper>, SourceError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header("Accept", "application/atom+xml")
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SourceError::RateLimit);
        }

        let bytes = response.bytes().await?;

        if !status.is_success() {
            // Rejected queries come back as a 400 carrying an error feed
            if let Err(err @ SourceError::Api(_)) = Self::parse_feed(&bytes) {
                return Err(err);
            }
            return Err(SourceError::Api(format!(
                "arXiv API returned status: {}",
                status
            )));
        }

        Self::parse_feed(&bytes)
    }

    /// Parse an arXiv Atom feed into papers, in feed order
    pub fn parse_feed(bytes: &[u8]) -> Result<Vec<Paper>, SourceError> {
        let feed = parser::parse(bytes)?;

        if let Some(error) = feed.entries.iter().find(|e| e.id.contains(ERROR_ENTRY_MARKER)) {
            let message = error
                .summary
                .as_ref()
                .map(|s| collapse_whitespace(&s.content))
                .unwrap_or_else(|| "query rejected".to_string());
            return Err(SourceError::Api(message));
        }

        feed.entries.iter().map(Self::parse_entry).collect()
    }

    /// Parse arXiv Atom feed entry into Paper
    fn parse_entry(entry: &Entry) -> Result<Paper, SourceError> {
        let paper_id = Self::id_from_url(&entry.id)
            .ok_or_else(|| SourceError::Parse(format!("Missing paper ID in {:?}", entry.id)))?;

        let title = entry
            .title
            .as_ref()
            .map(|t| collapse_whitespace(&t.content))
            .unwrap_or_default();

        let summary = entry
            .summary
            .as_ref()
            .map(|s| collapse_whitespace(&s.content))
            .unwrap_or_default();

        let pdf_url = entry
            .links
            .iter()
            .find(|l| {
                l.title.as_deref() == Some("pdf")
                    || l.media_type.as_deref() == Some("application/pdf")
            })
            .map(|l| l.href.clone())
            .unwrap_or_else(|| entry.id.replacen("/abs/", "/pdf/", 1));

        let mut builder = PaperBuilder::new(paper_id, title, entry.id.clone())
            .authors(entry.authors.iter().map(|a| a.name.trim().to_string()))
            .summary(summary)
            .categories(entry.categories.iter().map(|c| c.term.clone()))
            .pdf_url(pdf_url);

        if let Some(published) = entry.published {
            builder = builder.published(published);
        }

        Ok(builder.build())
    }
}

#[async_trait]
impl Source for ArxivSource {
    fn id(&self) -> &str {
        "arxiv"
    }

    fn name(&self) -> &str {
        "arXiv"
    }

    async fn search(
        &self,
        request: &FetchRequest,
        progress: &dyn FetchProgress,
    ) -> Result<Vec<Paper>, SourceError> {
        let mut papers: Vec<Paper> = Vec::with_capacity(request.max_results.min(self.page_size));
        let mut start = 0;

        while papers.len() < request.max_results {
            if start > 0 && !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }

            let size = (request.max_results - papers.len()).min(self.page_size);
            let url = self.page_url(request, start, size);
            let page = with_retry(self.retry, || self.fetch_page(&url)).await?;

            let received = page.len();
            tracing::debug!("Page at offset {} returned {} entries", start, received);
            progress.advance(received);
            papers.extend(page);

            if received < size {
                break;
            }
            start += received;
        }

        papers.truncate(request.max_results);
        Ok(papers)
    }
}
