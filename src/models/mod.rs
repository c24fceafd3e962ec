//! Core data models for papers, search criteria and fetch requests.

mod criteria;
mod paper;
mod search;

pub use criteria::{Criteria, SearchField, WILDCARD_QUERY};
pub use paper::{Paper, PaperBuilder, PaperRow, MAX_LISTED_AUTHORS};
pub use search::{FetchRequest, SortOrder};
