use anyhow::Result;
use arxiv_tracker::config::{load_layer, run_wizard, ConfigError, DEFAULT_CONFIG_FILE};
use arxiv_tracker::models::SearchField;
use arxiv_tracker::output::OutputFormat;
use arxiv_tracker::sources::ArxivSource;
use arxiv_tracker::ui::{Reporter, Status};
use arxiv_tracker::{Config, ConfigLayer, RunSummary, Tracker, TrackerError};
use clap::Parser;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Registry};

/// arXiv tracker - report new papers since the last run
#[derive(Parser, Debug)]
#[command(name = "arxiv-tracker")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "hongkongkiwi")]
#[command(about = "Fetch new arXiv papers by category and keyword, skipping ones already seen", long_about = None)]
struct Cli {
    /// JSON configuration file (defaults to ./config.json when present)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// arXiv categories, e.g. cs.CV cs.LG
    #[arg(long, num_args = 1..)]
    categories: Option<Vec<String>>,

    /// Search keywords
    #[arg(long, num_args = 1..)]
    keywords: Option<Vec<String>>,

    /// Fields keywords are matched in
    #[arg(long, value_enum, num_args = 1..)]
    keyword_fields: Option<Vec<SearchField>>,

    /// Maximum number of papers to fetch [default: 10]
    #[arg(long)]
    max_results: Option<usize>,

    /// Directory for result files [default: outputs]
    #[arg(long, short)]
    output_dir: Option<PathBuf>,

    /// Output formats [default: console]
    #[arg(long, short = 'f', value_enum, num_args = 1..)]
    output_formats: Option<Vec<OutputFormat>>,

    /// History file of already reported papers [default: papers_history.json]
    #[arg(long)]
    history_file: Option<PathBuf>,

    /// Only print errors and a one-line summary
    #[arg(long, short)]
    silent: bool,

    /// Run the setup wizard
    #[arg(long, short)]
    interactive: bool,

    /// Disable SSL certificate verification
    #[arg(long)]
    no_verify_ssl: bool,

    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv, -vvv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Settings given explicitly on the command line
    fn to_layer(&self) -> ConfigLayer {
        ConfigLayer {
            categories: self.categories.clone(),
            keywords: self.keywords.clone(),
            keyword_fields: self.keyword_fields.clone(),
            max_results: self.max_results,
            output_dir: self.output_dir.clone(),
            output_formats: self.output_formats.clone(),
            history_file: self.history_file.clone(),
            silent: self.silent.then_some(true),
            verify_ssl: self.no_verify_ssl.then_some(false),
        }
    }
}

/// Default `arxiv_tracker` directive for the verbosity counter and silent mode
fn default_directive(verbose: u8, silent: bool) -> String {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = if silent { "error" } else { log_level };
    format!("arxiv_tracker={}", env_filter)
}

fn log_filter(verbose: u8, silent: bool) -> EnvFilter {
    EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| default_directive(verbose, silent)))
}

/// Install the subscriber. The returned handle swaps the filter once the
/// config file has had its say on silent mode.
fn init_tracing(verbose: u8, silent: bool) -> reload::Handle<EnvFilter, Registry> {
    let (filter, handle) = reload::Layer::new(log_filter(verbose, silent));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    handle
}

/// Resolve the configuration, running the wizard when asked or needed.
fn resolve_config(cli: &Cli) -> Result<Config, ConfigError> {
    let file = match &cli.config {
        Some(path) => (path.as_path(), true),
        None => (Path::new(DEFAULT_CONFIG_FILE), false),
    };

    let mut layers = vec![load_layer(Some(file), None)?, cli.to_layer()];
    let config = Config::resolve(&layers)?;

    let can_prompt = !config.silent && std::io::stdin().is_terminal();
    if !(cli.interactive || config.is_unfiltered()) {
        return Ok(config);
    }
    if !can_prompt {
        if cli.interactive {
            tracing::warn!("Interactive mode needs a terminal and is ignored in silent mode");
        }
        return Ok(config);
    }

    layers.push(run_wizard(&config)?);
    let config = Config::resolve(&layers)?;
    config.to_layer().save(Path::new(DEFAULT_CONFIG_FILE))?;
    tracing::info!("Saved answers to {}", DEFAULT_CONFIG_FILE);
    Ok(config)
}

async fn track(config: Config, reporter: Reporter) -> Result<RunSummary> {
    if !config.verify_ssl {
        reporter.status(
            Status::Warning,
            "SSL certificate verification is disabled; connections are not authenticated",
        );
    }

    let source = ArxivSource::new(config.verify_ssl).map_err(TrackerError::from)?;
    let mut tracker = Tracker::new(config, Arc::new(source), reporter);
    Ok(tracker.run().await?)
}

/// Print diagnostics for `err` and pick the exit code.
fn report_failure(err: &anyhow::Error, reporter: Reporter) -> ExitCode {
    let Some(tracker_err) = err.downcast_ref::<TrackerError>() else {
        reporter.error(format!("{:#}", err));
        return ExitCode::FAILURE;
    };

    match tracker_err {
        TrackerError::Interrupted => {
            eprintln!();
            reporter.hint("Interrupted, exiting");
            return ExitCode::SUCCESS;
        }
        TrackerError::Certificate(detail) => {
            reporter.error("SSL certificate verification failed while contacting arXiv");
            if !reporter.is_quiet() {
                reporter.hint(detail);
            }
        }
        TrackerError::Network(detail) => {
            reporter.error("Network error while contacting arXiv");
            if !reporter.is_quiet() {
                reporter.hint(detail);
            }
        }
        other => {
            reporter.error(other.to_string());
            if !reporter.is_quiet() {
                let mut source = std::error::Error::source(other);
                while let Some(cause) = source {
                    reporter.hint(format!("caused by: {}", cause));
                    source = cause.source();
                }
            }
        }
    }

    if tracker_err.suggests_ssl_bypass() {
        reporter.hint("If your network intercepts TLS, retry with --no-verify-ssl");
    }
    ExitCode::FAILURE
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let log_handle = init_tracing(cli.verbose, cli.silent);

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(e) if e.is_interrupted() => {
            return report_failure(&TrackerError::Interrupted.into(), Reporter::new(cli.silent));
        }
        Err(e) => {
            return report_failure(&TrackerError::from(e).into(), Reporter::new(cli.silent));
        }
    };
    if config.silent != cli.silent {
        if let Err(e) = log_handle.reload(log_filter(cli.verbose, config.silent)) {
            tracing::warn!("Could not update log filter: {}", e);
        }
    }
    tracing::debug!("Resolved configuration: {:?}", config);

    let reporter = Reporter::new(config.silent);
    let outcome = tokio::select! {
        result = track(config, reporter) => result,
        _ = tokio::signal::ctrl_c() => Err(TrackerError::Interrupted.into()),
    };

    match outcome {
        Ok(summary) => {
            if reporter.is_quiet() {
                println!("Done, {} new papers", summary.new_papers);
            }
            ExitCode::SUCCESS
        }
        Err(err) => report_failure(&err, reporter),
    }
}
