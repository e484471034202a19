//! Run configuration, resolved once from the interactive prompts at startup
//! and passed by reference into extraction and download.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::models::{AppError, AppResult, QualityPreference};

/// A spreadsheet column addressed by letter, with its zero-based index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRef {
    pub letter: char,
    pub index: usize,
}

impl ColumnRef {
    /// Parse a single column letter (`A` → 0, `B` → 1, …, case-insensitive).
    pub fn parse(input: &str) -> AppResult<Self> {
        let trimmed = input.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => {
                let letter = c.to_ascii_uppercase();
                Ok(Self {
                    letter,
                    index: (letter as u8 - b'A') as usize,
                })
            }
            _ => Err(AppError::Config(format!(
                "expected a single column letter, got {trimmed:?}"
            ))),
        }
    }
}

/// The three operator-chosen columns: title, extra info, hyperlink.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub title: ColumnRef,
    pub extra_info: ColumnRef,
    pub link: ColumnRef,
}

impl ColumnMapping {
    /// Highest mapped index; rows shorter than this cannot be extracted.
    pub fn max_index(&self) -> usize {
        self.title
            .index
            .max(self.extra_info.index)
            .max(self.link.index)
    }
}

/// Everything the run needs, fixed before any work begins.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// The chosen spreadsheet file.
    pub workbook: PathBuf,
    pub columns: ColumnMapping,
    /// Created if absent.
    pub output_dir: PathBuf,
    pub quality: QualityPreference,
}
