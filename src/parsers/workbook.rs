//! Loading the first sheet of a workbook into a uniform table.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use tracing::debug;

use super::hyperlinks;

/// The first sheet of a workbook: cell values plus the external hyperlink
/// targets of its cells, both in absolute zero-based grid coordinates.
#[derive(Debug, Clone)]
pub struct SheetTable {
    /// All rows, header row included.
    pub rows: Vec<Vec<String>>,
    /// `(row, col)` → hyperlink target.
    pub hyperlinks: HashMap<(u32, u32), String>,
}

/// Open `path` and read the first sheet.
///
/// calamine ranges start at the first used cell, while column letters and
/// hyperlink refs address the absolute grid, so rows and columns before the
/// used range are padded with empty cells.
pub fn load_first_sheet(path: &Path) -> Result<SheetTable> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("failed to open spreadsheet: {}", path.display()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| anyhow!("spreadsheet has no sheets: {}", path.display()))?
        .with_context(|| format!("failed to read first sheet of {}", path.display()))?;

    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let mut rows: Vec<Vec<String>> = vec![Vec::new(); start_row as usize];
    for row in range.rows() {
        let mut cells = vec![String::new(); start_col as usize];
        cells.extend(row.iter().map(cell_to_string));
        rows.push(cells);
    }

    let file = File::open(path)
        .with_context(|| format!("failed to reopen spreadsheet: {}", path.display()))?;
    let hyperlinks = hyperlinks::sheet_hyperlinks(file)
        .with_context(|| format!("failed to read hyperlinks of {}", path.display()))?;

    debug!(
        "loaded first sheet of {}: {} row(s), {} hyperlink(s)",
        path.display(),
        rows.len(),
        hyperlinks.len()
    );
    Ok(SheetTable { rows, hyperlinks })
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::String(v) => v.to_string(),
        Data::Float(v) => v.to_string(),
        Data::Int(v) => v.to_string(),
        Data::Bool(v) => v.to_string(),
        Data::DateTime(v) => v.to_string(),
        Data::DateTimeIso(v) => v.to_string(),
        Data::DurationIso(v) => v.to_string(),
        Data::Error(v) => format!("{v:?}"),
        Data::Empty => String::new(),
    }
}
