//! CLI UI utilities: status lines, dividers and the fetch progress bar.
//!
//! Everything goes through a [`Reporter`] carrying an explicit `quiet`
//! flag. In quiet mode status output is dropped and the progress bar is
//! hidden; errors are always written to stderr.

use owo_colors::{OwoColorize, Stream};
use std::time::Duration;

use crate::sources::FetchProgress;

/// Width used when the terminal size cannot be determined.
pub const DEFAULT_WIDTH: usize = 80;

/// Get the current terminal width, capped so dividers stay readable.
pub fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(DEFAULT_WIDTH)
        .min(DEFAULT_WIDTH)
}

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Warning,
    Search,
    Saved,
    Empty,
}

/// Status icons for different operations.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Warning => "⚠",
        Status::Search => "🔍",
        Status::Saved => "💾",
        Status::Empty => "📭",
    }
}

/// Styled status line, colored only when the stream supports it.
fn styled(status: Status, msg: &str, stream: Stream) -> String {
    let icon = status_icon(status);
    let icon = match status {
        Status::Success => icon.if_supports_color(stream, |t| t.green()).to_string(),
        Status::Error => icon.if_supports_color(stream, |t| t.red()).to_string(),
        Status::Warning => icon.if_supports_color(stream, |t| t.yellow()).to_string(),
        Status::Search | Status::Saved | Status::Empty => icon.to_string(),
    };
    format!("{} {}", icon, msg)
}

/// Terminal reporter with an explicit quiet switch.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    quiet: bool,
}

impl Reporter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Reporter that prints nothing but errors
    pub fn quiet() -> Self {
        Self::new(true)
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Print a status line to stdout unless quiet.
    pub fn status(&self, status: Status, msg: impl AsRef<str>) {
        if !self.quiet {
            println!("{}", styled(status, msg.as_ref(), Stream::Stdout));
        }
    }

    /// Print an error line to stderr, regardless of quiet mode.
    pub fn error(&self, msg: impl AsRef<str>) {
        eprintln!("{}", styled(Status::Error, msg.as_ref(), Stream::Stderr));
    }

    /// Print an indented hint line to stderr, regardless of quiet mode.
    pub fn hint(&self, msg: impl AsRef<str>) {
        eprintln!("  {}", msg.as_ref().if_supports_color(Stream::Stderr, |t| t.dimmed()));
    }

    /// Progress bar for a fetch of up to `total` records.
    pub fn fetch_bar(&self, total: usize) -> FetchBar {
        FetchBar::new(total, self.quiet)
    }
}

/// Progress bar tracking records as they stream in.
#[derive(Debug, Clone)]
pub struct FetchBar {
    pb: indicatif::ProgressBar,
}

impl FetchBar {
    fn new(total: usize, hidden: bool) -> Self {
        if hidden {
            return Self {
                pb: indicatif::ProgressBar::hidden(),
            };
        }

        let pb = indicatif::ProgressBar::new(total as u64);
        pb.set_style(
            indicatif::ProgressStyle::with_template(
                "{spinner:.cyan} Fetching papers [{bar:30.cyan/blue}] {pos}/{len} ({elapsed})",
            )
            .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar())
            .progress_chars("=>-"),
        );
        pb.enable_steady_tick(Duration::from_millis(120));
        Self { pb }
    }

    /// Records fetched so far
    pub fn position(&self) -> u64 {
        self.pb.position()
    }

    /// Remove the bar from the terminal.
    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

impl FetchProgress for FetchBar {
    fn advance(&self, count: usize) {
        self.pb.inc(count as u64);
    }
}
