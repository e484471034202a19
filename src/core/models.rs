//! Core data models for the batch downloader

use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One spreadsheet row slated for download: a sanitized display name and the
/// hyperlink target it came with. The order of entries is the order of the
/// source rows and is preserved through to download order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoEntry {
    pub name: String,
    pub url: String,
}

impl VideoEntry {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// File name of the finished download, `<name>.mp4`.
    pub fn file_name(&self) -> String {
        format!("{}.mp4", self.name)
    }
}

/// Quality preference handed to the download collaborator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum QualityPreference {
    /// Best available video+audio streams, merged into mp4. Needs ffmpeg.
    #[default]
    Best,
    /// Best single-file mp4. No merge step.
    Progressive,
}

/// Terminal per-entry result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DownloadOutcome {
    /// Output file already existed; the collaborator was not invoked.
    Skipped,
    Succeeded,
    Failed { message: String },
}

/// Outcome of one entry, as recorded in the batch report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryReport {
    pub name: String,
    pub url: String,
    #[serde(flatten)]
    pub outcome: DownloadOutcome,
}

/// Result of a whole batch run. Saved next to the downloads so the run is
/// inspectable after the console scrolls away; never read back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub entries: Vec<EntryReport>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.count(|o| matches!(o, DownloadOutcome::Succeeded))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, DownloadOutcome::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, DownloadOutcome::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&DownloadOutcome) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(&e.outcome)).count()
    }

    /// Save the report as pretty JSON.
    pub fn save(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content =
            serde_json::to_string_pretty(self).context("failed to serialize batch report")?;
        std::fs::write(path, content)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }
}

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no .xlsx file found in {}", .0.display())]
    NoSpreadsheetFound(PathBuf),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("download error: {0}")]
    Download(String),
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
