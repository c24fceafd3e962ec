//! Filtering fetched papers against the history set.

use std::collections::HashSet;

use crate::models::Paper;
use crate::utils::history::HistorySet;

/// Keep only papers whose identifier is not in `history`.
///
/// Relative order is preserved. Every identifier of the raw sequence is
/// recorded in `history`, including ones already present. When the same
/// identifier appears twice in one pass only the first occurrence is kept.
pub fn filter_new(papers: Vec<Paper>, history: &mut HistorySet) -> Vec<Paper> {
    let mut seen_this_pass: HashSet<String> = HashSet::new();
    let mut fresh = Vec::new();

    for paper in papers {
        if !seen_this_pass.insert(paper.paper_id.clone()) {
            tracing::debug!("Dropping repeated id {} within pass", paper.paper_id);
            continue;
        }
        if history.insert(paper.paper_id.clone()) {
            fresh.push(paper);
        }
    }

    fresh
}
