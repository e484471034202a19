//! Sheet Downloader - Core Library
//!
//! Reads a spreadsheet of titled hyperlinks and sequentially downloads each
//! linked video to a local folder, naming the output files from spreadsheet
//! columns. The interactive flow lives in the binary; everything else is
//! library code so the pipeline can be exercised in tests.

pub mod core;
pub mod parsers;
pub mod utils;

// Re-export commonly used types
pub use crate::core::{
    batch::BatchDownloader,
    config::{ColumnMapping, ColumnRef, RunConfig},
    downloader::{VideoFetcher, YtDlpFetcher},
    models::{
        AppError, AppResult, BatchReport, DownloadOutcome, EntryReport, QualityPreference,
        VideoEntry,
    },
};
pub use crate::parsers::{extract_entries, load_first_sheet, ExtractStats, SheetTable};
pub use crate::utils::filename::FilenameSanitizer;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
