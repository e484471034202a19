//! Walking the sheet rows into the ordered download work list.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::workbook::SheetTable;
use crate::core::config::ColumnMapping;
use crate::core::models::VideoEntry;
use crate::utils::filename::FilenameSanitizer;

/// Row accounting for one extraction pass.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ExtractStats {
    /// Data rows visited (header excluded).
    pub total_rows: usize,
    pub extracted: usize,
    /// Rows dropped: too few columns, blank title, or no embedded hyperlink.
    pub skipped: usize,
}

/// Produce the ordered entry list from the sheet.
///
/// Row 1 is a header by fixed convention and is always skipped. A row joins
/// the list only with a non-blank title and an embedded hyperlink in the
/// link column; a plain-text URL typed into the cell does not count. Entry
/// order equals row order.
pub fn extract_entries(
    table: &SheetTable,
    columns: &ColumnMapping,
) -> (Vec<VideoEntry>, ExtractStats) {
    let sanitizer = FilenameSanitizer::new();
    let mut entries = Vec::new();
    let mut stats = ExtractStats::default();

    for (row_idx, row) in table.rows.iter().enumerate().skip(1) {
        stats.total_rows += 1;

        if row.len() <= columns.max_index() {
            stats.skipped += 1;
            debug!("row {}: too few columns, skipped", row_idx + 1);
            continue;
        }

        let title = row[columns.title.index].trim();
        if title.is_empty() {
            stats.skipped += 1;
            debug!("row {}: blank title, skipped", row_idx + 1);
            continue;
        }

        let link = match table
            .hyperlinks
            .get(&(row_idx as u32, columns.link.index as u32))
        {
            Some(link) if !link.is_empty() => link,
            _ => {
                stats.skipped += 1;
                debug!("row {}: no hyperlink in link column, skipped", row_idx + 1);
                continue;
            }
        };

        let extra = row[columns.extra_info.index].trim();
        let display = if extra.is_empty() {
            title.to_string()
        } else {
            format!("{title} ({extra})")
        };

        entries.push(VideoEntry::new(sanitizer.sanitize(&display), link.clone()));
        stats.extracted += 1;
    }

    (entries, stats)
}
