//! # arxiv-tracker
//!
//! Incremental tracker for new arXiv papers. Each run queries the arXiv
//! API for the configured categories and keywords, drops every paper whose
//! identifier was already reported by an earlier run, persists the updated
//! history and renders the new papers to the console and result files.
//!
//! ## Architecture
//!
//! - [`models`]: Core data structures (Paper, Criteria, FetchRequest)
//! - [`sources`]: Paper index clients behind the [`Source`] trait
//! - [`tracker`]: One tracking pass from query to rendered output
//! - [`output`]: Console, text, Markdown, CSV and JSON renderers
//! - [`config`]: Layered configuration and the interactive wizard
//! - [`ui`]: Status lines and progress bars
//! - [`utils`]: History store, deduplication, HTTP client and retries

pub mod config;
pub mod models;
pub mod output;
pub mod sources;
pub mod tracker;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use config::{Config, ConfigLayer};
pub use models::{Criteria, Paper};
pub use sources::{ArxivSource, Source};
pub use tracker::{RunSummary, Tracker, TrackerError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
