//! Spreadsheet parsing modules
//!
//! Workbook loading, hyperlink-target extraction from the xlsx container and
//! the row-to-entry walk.

pub mod extractor;
pub mod hyperlinks;
pub mod workbook;

// Re-export commonly used parsers
pub use extractor::{extract_entries, ExtractStats};
pub use workbook::{load_first_sheet, SheetTable};
