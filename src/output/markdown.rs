//! Markdown report.

use super::{RenderContext, REPORT_TITLE};
use crate::models::PaperRow;

/// Render `rows` as a Markdown document, one H2 section per paper.
pub fn render_markdown(rows: &[PaperRow], ctx: &RenderContext) -> String {
    let mut out = String::new();

    out.push_str(&format!("# {} - {}\n\n", REPORT_TITLE, ctx.date()));
    out.push_str(&format!("**Query time**: {}\n\n", ctx.timestamp()));
    if !ctx.query.is_empty() {
        out.push_str(&format!("**Query**: `{}`\n\n", ctx.query));
    }
    out.push_str(&format!("**Papers**: {}\n\n", rows.len()));
    out.push_str("---\n\n");

    for row in rows {
        out.push_str(&format!("## {}\n\n", row.title));
        out.push_str(&format!("**arXiv ID**: `{}`  \n", row.arxiv_id));
        out.push_str(&format!("**Authors**: {}  \n", row.authors));
        out.push_str(&format!("**Published**: {}  \n", row.published));
        out.push_str(&format!("**Categories**: {}\n\n", row.categories));
        out.push_str(&format!("**Summary**: {}\n\n", row.summary));
        out.push_str(&format!(
            "**Links**: [Abstract page]({}) | [PDF]({})\n\n",
            row.url, row.pdf_url
        ));
        out.push_str("---\n\n");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::tests::context;
    use crate::sources::mock::make_paper;

    #[test]
    fn test_markdown_sections() {
        let rows = vec![
            make_paper("2403.00001v1", "First").to_row(),
            make_paper("2403.00002v1", "Second").to_row(),
        ];

        let md = render_markdown(&rows, &context());

        assert!(md.starts_with("# arXiv tracking results - 2024-03-08\n"));
        assert!(md.contains("**Query**: `(cat:cs.CL)`"));
        assert!(md.contains("**Papers**: 2"));
        assert!(md.contains("## First\n"));
        assert!(md.contains("## Second\n"));
        assert!(md.contains(
            "[Abstract page](http://arxiv.org/abs/2403.00002v1) | [PDF](http://arxiv.org/pdf/2403.00002v1)"
        ));
    }
}
