//! Utility modules supporting a tracking run.
//!
//! - [`HistoryStore`]: load/save the set of already-seen identifiers
//! - [`filter_new`]: drop papers whose identifier is already in the history
//! - [`HttpClient`]: shared HTTP client with optional certificate bypass
//! - [`with_retry`]: execute an operation with retry on transient errors
//! - [`write_atomic`]: replace a file without ever exposing a partial write
//! - [`truncate_summary`]: the summary truncation used by every output format
//!
//! # History and deduplication
//!
//! ```rust,no_run
//! use arxiv_tracker::utils::{filter_new, HistoryStore};
//! use arxiv_tracker::models::Paper;
//!
//! # fn example(papers: Vec<Paper>) -> Result<(), Box<dyn std::error::Error>> {
//! let store = HistoryStore::new("papers_history.json");
//! let mut history = store.load();
//! let fresh = filter_new(papers, &mut history);
//! store.save(&history)?;
//! println!("{} new papers", fresh.len());
//! # Ok(())
//! # }
//! ```

mod dedup;
mod display;
mod history;
mod http;
mod persist;
mod retry;

pub use dedup::filter_new;
pub use display::{collapse_whitespace, truncate_summary, ELLIPSIS, SUMMARY_MAX_CHARS};
pub use history::{HistoryError, HistorySet, HistoryStore, DEFAULT_HISTORY_FILE};
pub use http::{HttpClient, USER_AGENT};
pub use persist::write_atomic;
pub use retry::{arxiv_retry_config, with_retry, RetryConfig, TransientError};
