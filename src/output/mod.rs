//! Rendering new papers to the console and to dated result files.
//!
//! Every format is rendered independently: a failure in one is recorded in
//! the [`RenderReport`] and the remaining formats still run.
//!
//! | Format     | Destination                     |
//! |------------|---------------------------------|
//! | `console`  | stdout (skipped in quiet mode)  |
//! | `text`     | `<date>_results.txt`            |
//! | `markdown` | `<date>_results.md`             |
//! | `csv`      | `<date>_results.csv`            |
//! | `json`     | `<date>_results.json`           |

mod console;
mod markdown;
mod tabular;
mod text;

pub use console::render_console;
pub use markdown::render_markdown;
pub use tabular::{render_csv, render_json};
pub use text::render_text;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, IsTerminal};
use std::path::PathBuf;

use crate::models::{Paper, PaperRow};
use crate::ui::{Reporter, Status};
use crate::utils::write_atomic;

/// Default directory for result files
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";

/// Title shared by every report header
pub const REPORT_TITLE: &str = "arXiv tracking results";

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable listing on stdout
    Console,
    /// Plain text file
    #[serde(alias = "txt")]
    #[value(alias = "txt")]
    Text,
    /// Markdown file
    #[serde(alias = "md")]
    #[value(alias = "md")]
    Markdown,
    /// CSV file with a header row
    Csv,
    /// Pretty-printed JSON array
    #[serde(alias = "structured")]
    #[value(alias = "structured")]
    Json,
}

impl OutputFormat {
    /// Every format, in menu order
    pub const ALL: [OutputFormat; 5] = [
        OutputFormat::Console,
        OutputFormat::Text,
        OutputFormat::Markdown,
        OutputFormat::Csv,
        OutputFormat::Json,
    ];

    /// File extension, or `None` for formats that do not write a file
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            OutputFormat::Console => None,
            OutputFormat::Text => Some("txt"),
            OutputFormat::Markdown => Some("md"),
            OutputFormat::Csv => Some("csv"),
            OutputFormat::Json => Some("json"),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Console => "console",
            OutputFormat::Text => "text",
            OutputFormat::Markdown => "markdown",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        };
        f.write_str(name)
    }
}

/// Errors raised while rendering one format
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Metadata shown in report headers
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// When the report was produced
    pub generated_at: DateTime<Local>,
    /// Query the papers were fetched with
    pub query: String,
}

impl RenderContext {
    /// Calendar date used in headers and file names
    pub fn date(&self) -> String {
        self.generated_at.format("%Y-%m-%d").to_string()
    }

    /// Minute-resolution timestamp for headers
    pub fn timestamp(&self) -> String {
        self.generated_at.format("%Y-%m-%d %H:%M").to_string()
    }
}

/// Outcome of rendering all requested formats
#[derive(Debug, Default)]
pub struct RenderReport {
    /// Files written, in request order
    pub written: Vec<PathBuf>,
    /// Formats that failed, with their error
    pub failures: Vec<(OutputFormat, OutputError)>,
    /// Nothing was rendered because there were no papers
    pub empty: bool,
}

impl RenderReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Renders papers into the requested formats
#[derive(Debug, Clone)]
pub struct Renderer {
    output_dir: PathBuf,
    reporter: Reporter,
    context: RenderContext,
}

impl Renderer {
    /// Create a renderer writing files into `output_dir`
    pub fn new(output_dir: impl Into<PathBuf>, reporter: Reporter) -> Self {
        Self {
            output_dir: output_dir.into(),
            reporter,
            context: RenderContext {
                generated_at: Local::now(),
                query: String::new(),
            },
        }
    }

    /// Set the query shown in report headers
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.context.query = query.into();
        self
    }

    /// Pin the report timestamp
    pub fn generated_at(mut self, at: DateTime<Local>) -> Self {
        self.context.generated_at = at;
        self
    }

    /// Destination file for `format`, if it writes one
    pub fn file_path(&self, format: OutputFormat) -> Option<PathBuf> {
        format.extension().map(|ext| {
            self.output_dir
                .join(format!("{}_results.{}", self.context.date(), ext))
        })
    }

    /// Render `papers` in each of `formats`.
    ///
    /// With no papers a single notice is printed and nothing is written.
    pub fn render(&self, papers: &[Paper], formats: &[OutputFormat]) -> RenderReport {
        let mut report = RenderReport::default();

        if papers.is_empty() {
            self.reporter.status(Status::Empty, "No new papers");
            report.empty = true;
            return report;
        }

        let rows: Vec<PaperRow> = papers.iter().map(Paper::to_row).collect();
        let mut done: Vec<OutputFormat> = Vec::with_capacity(formats.len());

        for &format in formats {
            if done.contains(&format) {
                continue;
            }
            done.push(format);

            match self.render_one(format, &rows) {
                Ok(Some(path)) => {
                    self.reporter.status(
                        Status::Saved,
                        format!("{} saved: {}", format, path.display()),
                    );
                    report.written.push(path);
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::error!("Rendering {} failed: {}", format, e);
                    self.reporter
                        .error(format!("Failed to write {} output: {}", format, e));
                    report.failures.push((format, e));
                }
            }
        }

        report
    }

    fn render_one(
        &self,
        format: OutputFormat,
        rows: &[PaperRow],
    ) -> Result<Option<PathBuf>, OutputError> {
        let content = match format {
            OutputFormat::Console => {
                if !self.reporter.is_quiet() {
                    let stdout = io::stdout();
                    let color = stdout.is_terminal();
                    render_console(&mut stdout.lock(), rows, &self.context, color)?;
                }
                return Ok(None);
            }
            OutputFormat::Text => render_text(rows, &self.context),
            OutputFormat::Markdown => render_markdown(rows, &self.context),
            OutputFormat::Csv => render_csv(rows)?,
            OutputFormat::Json => render_json(rows)?,
        };

        let Some(path) = self.file_path(format) else {
            return Ok(None);
        };
        write_atomic(&path, content.as_bytes())?;
        Ok(Some(path))
    }
}
