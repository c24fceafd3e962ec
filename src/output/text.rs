//! Plain text report.

use super::{RenderContext, REPORT_TITLE};
use crate::models::PaperRow;

const RULE_WIDTH: usize = 80;

/// Render `rows` as a plain text report.
pub fn render_text(rows: &[PaperRow], ctx: &RenderContext) -> String {
    let mut out = String::new();

    out.push_str(&format!("{} - {}\n", REPORT_TITLE, ctx.date()));
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push_str("\n\n");

    for row in rows {
        out.push_str(&format!("[{}] {}\n", row.arxiv_id, row.title));
        out.push_str(&format!("Authors: {}\n", row.authors));
        out.push_str(&format!(
            "Published: {} | Categories: {}\n",
            row.published, row.categories
        ));
        out.push_str(&format!("Summary: {}\n", row.summary));
        out.push_str(&format!("URL: {}\n", row.url));
        out.push_str(&format!("PDF: {}\n", row.pdf_url));
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::tests::context;
    use crate::sources::mock::make_paper;

    #[test]
    fn test_text_report_layout() {
        let rows = vec![make_paper("2403.00001v1", "First").to_row()];

        let text = render_text(&rows, &context());
        let mut lines = text.lines();

        assert_eq!(lines.next(), Some("arXiv tracking results - 2024-03-08"));
        assert_eq!(lines.next(), Some("=".repeat(80).as_str()));
        assert_eq!(lines.next(), Some(""));
        assert_eq!(lines.next(), Some("[2403.00001v1] First"));
        assert_eq!(lines.next(), Some("Authors: Test Author"));
        assert!(text.contains("Summary: Abstract of First\n"));
    }
}
