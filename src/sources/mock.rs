//! Mock source for testing purposes.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::models::{FetchRequest, Paper, PaperBuilder};
use crate::sources::{FetchProgress, Source, SourceError};

/// A mock source for testing that returns predefined papers.
///
/// Responses are truncated to the request's `max_results`, like a real
/// index would.
#[derive(Debug, Default)]
pub struct MockSource {
    papers: Mutex<Vec<Paper>>,
    failure: Mutex<Option<String>>,
    last_request: Mutex<Option<FetchRequest>>,
}

impl MockSource {
    /// Create a new mock source with no papers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock source that returns `papers`.
    pub fn with_papers(papers: Vec<Paper>) -> Self {
        let source = Self::new();
        source.set_papers(papers);
        source
    }

    /// Set the papers to return.
    pub fn set_papers(&self, papers: Vec<Paper>) {
        *self.papers.lock().unwrap() = papers;
    }

    /// Make every search fail with a network error carrying `message`.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock().unwrap() = Some(message.into());
    }

    /// The most recent request received, if any.
    pub fn last_request(&self) -> Option<FetchRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl Source for MockSource {
    fn id(&self) -> &str {
        "mock"
    }

    fn name(&self) -> &str {
        "Mock Source"
    }

    async fn search(
        &self,
        request: &FetchRequest,
        progress: &dyn FetchProgress,
    ) -> Result<Vec<Paper>, SourceError> {
        *self.last_request.lock().unwrap() = Some(request.clone());

        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(SourceError::Network(message));
        }

        let papers: Vec<Paper> = self
            .papers
            .lock()
            .unwrap()
            .iter()
            .take(request.max_results)
            .cloned()
            .collect();
        progress.advance(papers.len());
        Ok(papers)
    }
}

/// Helper function to create a mock paper for testing.
pub fn make_paper(paper_id: &str, title: &str) -> Paper {
    PaperBuilder::new(paper_id, title, format!("http://arxiv.org/abs/{}", paper_id))
        .authors(["Test Author"])
        .summary(format!("Abstract of {}", title))
        .categories(["cs.CL"])
        .pdf_url(format!("http://arxiv.org/pdf/{}", paper_id))
        .build()
}
