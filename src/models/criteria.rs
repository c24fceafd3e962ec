//! Search criteria and the query string built from them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Query used when neither categories nor keywords are configured.
pub const WILDCARD_QUERY: &str = "cat:cs.*";

/// Field a keyword is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    /// Paper title (`ti:`)
    #[serde(alias = "ti", alias = "ti:")]
    #[value(alias = "ti")]
    Title,
    /// Abstract text (`abs:`)
    #[serde(alias = "abs", alias = "abs:")]
    #[value(alias = "abs")]
    Abstract,
    /// Every indexed field (`all:`)
    #[serde(alias = "all:")]
    All,
}

impl SearchField {
    /// Field prefix in the arXiv query language
    pub fn prefix(&self) -> &'static str {
        match self {
            SearchField::Title => "ti",
            SearchField::Abstract => "abs",
            SearchField::All => "all",
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchField::Title => "title",
            SearchField::Abstract => "abstract",
            SearchField::All => "all",
        };
        f.write_str(name)
    }
}

/// Resolved search parameters for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Criteria {
    categories: Vec<String>,
    keywords: Vec<String>,
    fields: Vec<SearchField>,
    max_results: usize,
}

impl Criteria {
    /// Build criteria, dropping blank and repeated entries while keeping
    /// first-seen order. An empty field list falls back to [`SearchField::All`].
    pub fn new(
        categories: impl IntoIterator<Item = String>,
        keywords: impl IntoIterator<Item = String>,
        fields: impl IntoIterator<Item = SearchField>,
        max_results: usize,
    ) -> Self {
        let mut fields = unique(fields);
        if fields.is_empty() {
            fields.push(SearchField::All);
        }
        Self {
            categories: unique(clean(categories)),
            keywords: unique(clean(keywords)),
            fields,
            max_results,
        }
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn fields(&self) -> &[SearchField] {
        &self.fields
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// True when neither categories nor keywords narrow the search
    pub fn is_unfiltered(&self) -> bool {
        self.categories.is_empty() && self.keywords.is_empty()
    }

    /// Compose the arXiv `search_query` expression.
    ///
    /// Categories form one parenthesised `OR` clause, keywords another over
    /// every field/keyword pair; the two are joined with `AND`.
    pub fn to_query(&self) -> String {
        let mut clauses = Vec::with_capacity(2);

        if !self.categories.is_empty() {
            let terms = self
                .categories
                .iter()
                .map(|cat| format!("cat:{}", cat))
                .collect::<Vec<_>>()
                .join(" OR ");
            clauses.push(format!("({})", terms));
        }

        if !self.keywords.is_empty() {
            let terms = self
                .fields
                .iter()
                .flat_map(|field| {
                    self.keywords
                        .iter()
                        .map(move |kw| format!("{}:{}", field.prefix(), quote_phrase(kw)))
                })
                .collect::<Vec<_>>()
                .join(" OR ");
            clauses.push(format!("({})", terms));
        }

        if clauses.is_empty() {
            WILDCARD_QUERY.to_string()
        } else {
            clauses.join(" AND ")
        }
    }
}

/// Multi-word keywords must be quoted to be matched as a phrase.
fn quote_phrase(keyword: &str) -> String {
    if keyword.chars().any(char::is_whitespace) {
        format!("\"{}\"", keyword)
    } else {
        keyword.to_string()
    }
}

fn clean(values: impl IntoIterator<Item = String>) -> impl Iterator<Item = String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn unique<T: PartialEq>(values: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut out = Vec::new();
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}
