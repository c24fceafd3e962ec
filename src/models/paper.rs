//! Paper model representing one fetched arXiv entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::truncate_summary;

/// Number of authors listed by name before collapsing into "et al."
pub const MAX_LISTED_AUTHORS: usize = 3;

/// A research paper as returned by the index.
///
/// Papers are immutable once fetched; the tracker owns them for the
/// duration of a single pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    /// arXiv identifier including the version suffix (e.g. `2301.12345v2`)
    pub paper_id: String,

    /// Paper title
    pub title: String,

    /// Author names in byline order
    pub authors: Vec<String>,

    /// Abstract text
    pub summary: String,

    /// Original submission timestamp
    pub published: Option<DateTime<Utc>>,

    /// arXiv categories (primary first)
    pub categories: Vec<String>,

    /// Abstract page URL
    pub url: String,

    /// Direct PDF URL
    pub pdf_url: String,
}

impl Paper {
    /// Create a new paper with required fields
    pub fn new(paper_id: String, title: String, url: String) -> Self {
        Self {
            paper_id,
            title,
            authors: Vec::new(),
            summary: String::new(),
            published: None,
            categories: Vec::new(),
            url,
            pdf_url: String::new(),
        }
    }

    /// Authors shortened to the first few names plus an "et al." marker
    pub fn author_line(&self) -> String {
        let mut line = self
            .authors
            .iter()
            .take(MAX_LISTED_AUTHORS)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        if self.authors.len() > MAX_LISTED_AUTHORS {
            line.push_str(&format!(" et al. ({} authors)", self.authors.len()));
        }
        line
    }

    /// Submission date as `YYYY-MM-DD`, empty when unknown
    pub fn published_day(&self) -> String {
        self.published
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }

    /// Flatten into the row every output format renders.
    pub fn to_row(&self) -> PaperRow {
        PaperRow {
            arxiv_id: self.paper_id.clone(),
            title: self.title.clone(),
            authors: self.author_line(),
            summary: truncate_summary(&self.summary),
            published: self.published_day(),
            categories: self.categories.join(", "),
            url: self.url.clone(),
            pdf_url: self.pdf_url.clone(),
        }
    }
}

/// Render-ready view of a [`Paper`].
///
/// Field order is the column order of the CSV export and the key order of
/// the JSON export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRow {
    pub arxiv_id: String,
    pub title: String,
    pub authors: String,
    pub summary: String,
    pub published: String,
    pub categories: String,
    pub url: String,
    pub pdf_url: String,
}

/// Builder for constructing Paper objects
#[derive(Debug, Clone)]
pub struct PaperBuilder {
    paper: Paper,
}

impl PaperBuilder {
    /// Create a new builder with required fields
    pub fn new(paper_id: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            paper: Paper::new(paper_id.into(), title.into(), url.into()),
        }
    }

    /// Set authors
    pub fn authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.paper.authors = authors.into_iter().map(Into::into).collect();
        self
    }

    /// Set abstract
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.paper.summary = summary.into();
        self
    }

    /// Set submission timestamp
    pub fn published(mut self, published: DateTime<Utc>) -> Self {
        self.paper.published = Some(published);
        self
    }

    /// Set categories
    pub fn categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.paper.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Set PDF URL
    pub fn pdf_url(mut self, url: impl Into<String>) -> Self {
        self.paper.pdf_url = url.into();
        self
    }

    /// Build the Paper
    pub fn build(self) -> Paper {
        self.paper
    }
}
