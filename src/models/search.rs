//! Fetch request model passed to a [`Source`](crate::sources::Source).

use serde::{Deserialize, Serialize};

/// Result ordering requested from the index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Most recently submitted first
    #[default]
    NewestFirst,
    /// Index-defined relevance ranking
    Relevance,
}

/// One logical fetch against the index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    /// Query expression in the index's query language
    pub query: String,

    /// Upper bound on the number of records returned
    pub max_results: usize,

    /// Result ordering
    pub sort: SortOrder,
}

impl FetchRequest {
    /// Create a request sorted newest-first
    pub fn new(query: impl Into<String>, max_results: usize) -> Self {
        Self {
            query: query.into(),
            max_results,
            sort: SortOrder::NewestFirst,
        }
    }

    /// Override the sort order
    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }
}
