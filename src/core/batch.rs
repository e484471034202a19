//! The sequential download driver.

use std::path::PathBuf;

use chrono::Utc;
use tracing::{info, warn};

use super::downloader::VideoFetcher;
use super::models::{AppResult, BatchReport, DownloadOutcome, EntryReport, VideoEntry};

/// Walks the work list in order, one download in flight at a time, and
/// records a terminal outcome per entry.
pub struct BatchDownloader<'a, F: VideoFetcher> {
    fetcher: &'a F,
    output_dir: PathBuf,
}

impl<'a, F: VideoFetcher> BatchDownloader<'a, F> {
    pub fn new(fetcher: &'a F, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            output_dir: output_dir.into(),
        }
    }

    /// Run the batch. Best-effort: a failed entry is recorded and the batch
    /// moves on. Errors outside the per-entry download call (such as an
    /// uncreatable output directory) abort the run.
    pub async fn run(&self, entries: &[VideoEntry]) -> AppResult<BatchReport> {
        std::fs::create_dir_all(&self.output_dir)?;

        let started_at = Utc::now();
        let total = entries.len();
        let mut reports = Vec::with_capacity(total);

        for (i, entry) in entries.iter().enumerate() {
            info!("processing video {}/{}: {}", i + 1, total, entry.name);
            let dest = self.output_dir.join(entry.file_name());

            let outcome = if dest.exists() {
                info!("{} already exists, skipping", dest.display());
                DownloadOutcome::Skipped
            } else {
                // The only caught-and-continued error class in the program:
                // everything outside this call propagates.
                match self.fetcher.fetch(&entry.url, &dest).await {
                    Ok(()) => DownloadOutcome::Succeeded,
                    Err(e) => {
                        warn!("download failed for {}: {e}", entry.url);
                        DownloadOutcome::Failed {
                            message: e.to_string(),
                        }
                    }
                }
            };

            reports.push(EntryReport {
                name: entry.name.clone(),
                url: entry.url.clone(),
                outcome,
            });
        }

        Ok(BatchReport {
            started_at,
            finished_at: Utc::now(),
            entries: reports,
        })
    }
}
