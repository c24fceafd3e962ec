//! CSV and JSON exports.
//!
//! Both serialize [`PaperRow`] directly, so the CSV columns and the JSON
//! keys follow its field order.

use super::OutputError;
use crate::models::PaperRow;

/// Render `rows` as CSV with a header row.
pub fn render_csv(rows: &[PaperRow]) -> Result<String, OutputError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| OutputError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| {
        OutputError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}

/// Render `rows` as a pretty-printed JSON array.
pub fn render_json(rows: &[PaperRow]) -> Result<String, OutputError> {
    let mut json = serde_json::to_string_pretty(rows)?;
    json.push('\n');
    Ok(json)
}
