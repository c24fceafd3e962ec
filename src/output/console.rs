//! Console listing.

use owo_colors::OwoColorize;
use std::io::{self, Write};

use super::{RenderContext, REPORT_TITLE};
use crate::models::PaperRow;
use crate::ui::terminal_width;

/// Write a numbered listing of `rows` to `out`.
///
/// `color` switches bold titles on; callers decide based on whether the
/// destination is a terminal.
pub fn render_console(
    out: &mut dyn Write,
    rows: &[PaperRow],
    ctx: &RenderContext,
    color: bool,
) -> io::Result<()> {
    let divider = "=".repeat(terminal_width());

    writeln!(out)?;
    writeln!(out, "{}", divider)?;
    writeln!(out, "📚 {} - {}", REPORT_TITLE, ctx.timestamp())?;
    writeln!(out, "{}", divider)?;

    for (i, row) in rows.iter().enumerate() {
        let heading = format!("[{}] {}", i + 1, row.title);
        writeln!(out)?;
        if color {
            writeln!(out, "{}", heading.bold())?;
        } else {
            writeln!(out, "{}", heading)?;
        }
        writeln!(out, "    ID: {}", row.arxiv_id)?;
        writeln!(out, "    Authors: {}", row.authors)?;
        writeln!(out, "    Published: {} | Categories: {}", row.published, row.categories)?;
        writeln!(out, "    Summary: {}", row.summary)?;
        writeln!(out, "    URL: {}", row.url)?;
        writeln!(out, "    PDF: {}", row.pdf_url)?;
    }

    writeln!(out)?;
    writeln!(out, "{}", divider)?;
    out.flush()
}
