//! One tracking pass: build the query, fetch, drop already-seen papers,
//! persist the history and render what is new.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{Config, ConfigError};
use crate::models::{Criteria, FetchRequest, WILDCARD_QUERY};
use crate::output::{OutputError, OutputFormat, Renderer};
use crate::sources::{Source, SourceError};
use crate::ui::{Reporter, Status};
use crate::utils::{filter_new, HistoryError, HistoryStore};

/// Stages of a pass. `Failed` is reachable from every non-terminal stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    QueryBuilt,
    Fetched,
    Deduplicated,
    Rendered,
    Done,
    Failed,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Done | RunState::Failed)
    }
}

/// Errors that end a pass
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("SSL certificate verification failed: {0}")]
    Certificate(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error(transparent)]
    Source(SourceError),

    #[error("Failed to save history: {0}")]
    History(#[from] HistoryError),

    #[error("Failed to write {} output format(s)", failures.len())]
    Render { failures: Vec<(OutputFormat, OutputError)> },

    #[error("Interrupted")]
    Interrupted,
}

impl From<SourceError> for TrackerError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::Certificate(msg) => TrackerError::Certificate(msg),
            SourceError::Network(msg) => TrackerError::Network(msg),
            other => TrackerError::Source(other),
        }
    }
}

/// Words that point at TLS trouble in otherwise unclassified source errors
const TLS_WORDS: [&str; 4] = ["ssl", "tls", "certificate", "eof"];

impl TrackerError {
    /// Whether the `--no-verify-ssl` hint applies.
    ///
    /// Only failures talking to the index qualify; local config and
    /// history problems never do, even when their message says "EOF".
    pub fn suggests_ssl_bypass(&self) -> bool {
        match self {
            TrackerError::Certificate(_) | TrackerError::Network(_) => true,
            TrackerError::Source(err) => {
                let text = err.to_string().to_lowercase();
                TLS_WORDS.iter().any(|w| text.contains(w))
            }
            TrackerError::Config(_)
            | TrackerError::History(_)
            | TrackerError::Render { .. }
            | TrackerError::Interrupted => false,
        }
    }
}

/// What a completed pass did
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub query: String,
    pub fetched: usize,
    pub new_papers: usize,
    pub history_size: usize,
    pub written: Vec<PathBuf>,
}

/// Runs one tracking pass against a [`Source`].
#[derive(Debug)]
pub struct Tracker {
    config: Config,
    source: Arc<dyn Source>,
    reporter: Reporter,
    state: RunState,
}

impl Tracker {
    pub fn new(config: Config, source: Arc<dyn Source>, reporter: Reporter) -> Self {
        Self {
            config,
            source,
            reporter,
            state: RunState::Idle,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    fn advance(&mut self, next: RunState) {
        tracing::debug!("Run state {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Execute the pass. A tracker runs once; later calls are rejected.
    pub async fn run(&mut self) -> Result<RunSummary, TrackerError> {
        if self.state != RunState::Idle {
            return Err(TrackerError::Source(SourceError::InvalidRequest(
                "tracker has already run".to_string(),
            )));
        }

        let result = self.execute().await;
        if result.is_err() {
            self.advance(RunState::Failed);
        }
        result
    }

    async fn execute(&mut self) -> Result<RunSummary, TrackerError> {
        let criteria = self.config.criteria();
        let query = build_query(&criteria);
        self.advance(RunState::QueryBuilt);

        self.reporter.status(Status::Search, format!("Query: {}", query));
        tracing::info!(source = self.source.id(), "Searching with query {}", query);

        let request = FetchRequest::new(query.clone(), criteria.max_results());
        let bar = self.reporter.fetch_bar(criteria.max_results());
        let fetched = self.source.search(&request, &bar).await;
        bar.finish();
        let fetched = fetched?;
        let fetched_count = fetched.len();
        self.advance(RunState::Fetched);

        let store = HistoryStore::new(&self.config.history_file);
        let mut history = store.load();
        let fresh = filter_new(fetched, &mut history);
        self.advance(RunState::Deduplicated);

        store.save(&history)?;
        tracing::info!(
            "Fetched {}, {} new, history now {}",
            fetched_count,
            fresh.len(),
            history.len()
        );

        if !fresh.is_empty() {
            self.reporter
                .status(Status::Success, format!("Found {} new papers", fresh.len()));
        }

        let report = Renderer::new(&self.config.output_dir, self.reporter)
            .query(query.clone())
            .render(&fresh, &self.config.output_formats);
        if !report.is_success() {
            return Err(TrackerError::Render {
                failures: report.failures,
            });
        }
        self.advance(RunState::Rendered);

        let summary = RunSummary {
            query,
            fetched: fetched_count,
            new_papers: fresh.len(),
            history_size: history.len(),
            written: report.written,
        };
        self.advance(RunState::Done);
        Ok(summary)
    }
}

/// The index query for `criteria`, falling back to the wildcard when
/// neither categories nor keywords are set.
pub fn build_query(criteria: &Criteria) -> String {
    if criteria.is_unfiltered() {
        tracing::warn!("No categories or keywords given, using {}", WILDCARD_QUERY);
        return WILDCARD_QUERY.to_string();
    }
    criteria.to_query()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::mock::make_paper;
    use crate::sources::MockSource;
    use std::path::Path;
    use tempfile::tempdir;

    fn config_in(dir: &Path) -> Config {
        Config {
            categories: vec!["cs.CL".into()],
            max_results: 5,
            output_dir: dir.join("outputs"),
            output_formats: vec![OutputFormat::Json],
            history_file: dir.join("papers_history.json"),
            ..Default::default()
        }
    }

    fn five_papers() -> Vec<crate::models::Paper> {
        (1..=5)
            .map(|i| make_paper(&format!("2403.0000{}v1", i), &format!("Paper {}", i)))
            .collect()
    }

    #[tokio::test]
    async fn test_first_run_reports_all_new() {
        let dir = tempdir().unwrap();
        let source = Arc::new(MockSource::with_papers(five_papers()));
        let mut tracker = Tracker::new(config_in(dir.path()), source.clone(), Reporter::quiet());

        let summary = tracker.run().await.unwrap();

        assert_eq!(summary.query, "(cat:cs.CL)");
        assert_eq!(summary.fetched, 5);
        assert_eq!(summary.new_papers, 5);
        assert_eq!(summary.history_size, 5);
        assert_eq!(summary.written.len(), 1);
        assert_eq!(tracker.state(), RunState::Done);
        assert_eq!(source.last_request().unwrap().max_results, 5);
    }

    #[tokio::test]
    async fn test_second_run_finds_nothing_new() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path());
        let source = Arc::new(MockSource::with_papers(five_papers()));

        Tracker::new(config.clone(), source.clone(), Reporter::quiet())
            .run()
            .await
            .unwrap();
        std::fs::remove_dir_all(dir.path().join("outputs")).unwrap();

        let summary = Tracker::new(config, source, Reporter::quiet())
            .run()
            .await
            .unwrap();

        assert_eq!(summary.new_papers, 0);
        assert_eq!(summary.history_size, 5);
        assert!(summary.written.is_empty());
        assert!(!dir.path().join("outputs").exists());
    }

    #[tokio::test]
    async fn test_invalid_history_is_treated_as_empty() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path());
        std::fs::write(&config.history_file, "{ definitely not json").unwrap();
        let source = Arc::new(MockSource::with_papers(five_papers()));

        let summary = Tracker::new(config, source, Reporter::quiet())
            .run()
            .await
            .unwrap();

        assert_eq!(summary.new_papers, 5);
        assert_eq!(summary.history_size, 5);
    }

    #[tokio::test]
    async fn test_network_failure_leaves_history_untouched() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path());
        let source = Arc::new(MockSource::new());
        source.fail_with("connection reset");
        let mut tracker = Tracker::new(config.clone(), source, Reporter::quiet());

        let err = tracker.run().await.unwrap_err();

        assert!(matches!(err, TrackerError::Network(_)));
        assert!(err.suggests_ssl_bypass());
        assert_eq!(tracker.state(), RunState::Failed);
        assert!(!config.history_file.exists());
    }

    #[tokio::test]
    async fn test_render_failure_still_saves_history() {
        let dir = tempdir().unwrap();
        let mut config = config_in(dir.path());
        // A plain file where the output directory should be
        std::fs::write(dir.path().join("outputs"), "").unwrap();
        config.output_formats = vec![OutputFormat::Csv];
        let source = Arc::new(MockSource::with_papers(five_papers()));
        let mut tracker = Tracker::new(config.clone(), source, Reporter::quiet());

        let err = tracker.run().await.unwrap_err();

        assert!(matches!(err, TrackerError::Render { ref failures } if failures.len() == 1));
        assert_eq!(tracker.state(), RunState::Failed);
        assert_eq!(HistoryStore::new(&config.history_file).load().len(), 5);
    }

    #[tokio::test]
    async fn test_tracker_runs_once() {
        let dir = tempdir().unwrap();
        let mut tracker = Tracker::new(
            config_in(dir.path()),
            Arc::new(MockSource::new()),
            Reporter::quiet(),
        );

        tracker.run().await.unwrap();
        assert!(tracker.run().await.is_err());
        assert_eq!(tracker.state(), RunState::Done);
        assert!(tracker.state().is_terminal());
    }

    #[test]
    fn test_wildcard_query_when_unfiltered() {
        let criteria = Criteria::new(Vec::new(), Vec::new(), Vec::new(), 10);
        assert_eq!(build_query(&criteria), "cat:cs.*");
    }

    #[test]
    fn test_certificate_error_mapping() {
        let err: TrackerError = SourceError::Certificate("unknown issuer".into()).into();
        assert!(matches!(err, TrackerError::Certificate(_)));
        assert!(err.suggests_ssl_bypass());

        let err: TrackerError = SourceError::Parse("bad xml".into()).into();
        assert!(matches!(err, TrackerError::Source(_)));
        assert!(!err.suggests_ssl_bypass());
    }

    #[test]
    fn test_unclassified_source_error_mentioning_tls() {
        let err: TrackerError = SourceError::Other("unexpected EOF during handshake".into()).into();
        assert!(err.suggests_ssl_bypass());
    }

    #[test]
    fn test_malformed_config_gets_no_ssl_hint() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"categories": ["cs.CL""#).unwrap();

        let err = crate::config::load_layer(Some((&path, true)), Some(Default::default()))
            .unwrap_err();
        let err = TrackerError::from(err);

        assert!(err.to_string().to_lowercase().contains("eof"));
        assert!(!err.suggests_ssl_bypass());
    }

    #[test]
    fn test_history_failure_gets_no_ssl_hint() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "unexpected eof");
        let err = TrackerError::History(HistoryError::Io(io));
        assert!(!err.suggests_ssl_bypass());
    }
}
