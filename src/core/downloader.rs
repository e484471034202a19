//! The external download collaborator.
//!
//! All transport is delegated to the `yt-dlp` binary on PATH. The fetcher
//! downloads into a staging directory and renames the finished file onto the
//! final path, so an interrupted run never publishes a truncated `.mp4`.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info};
use url::Url;

use super::models::{AppError, AppResult, QualityPreference};

/// stderr lines kept as the failure message when yt-dlp exits non-zero.
const STDERR_TAIL_LINES: usize = 8;

/// A function that, given a URL and an output path, retrieves remote media
/// and writes it to disk, erroring with a human-readable message on failure.
#[async_trait]
pub trait VideoFetcher {
    /// `dest`'s parent directory must exist.
    async fn fetch(&self, url: &str, dest: &Path) -> AppResult<()>;
}

/// `VideoFetcher` backed by the external `yt-dlp` binary.
pub struct YtDlpFetcher {
    binary: PathBuf,
    quality: QualityPreference,
}

impl YtDlpFetcher {
    pub fn new(quality: QualityPreference) -> Self {
        Self::with_binary("yt-dlp", quality)
    }

    /// Use a specific binary instead of `yt-dlp` from PATH.
    pub fn with_binary(binary: impl Into<PathBuf>, quality: QualityPreference) -> Self {
        Self {
            binary: binary.into(),
            quality,
        }
    }

    /// Argument list for one download, `<url>` last.
    fn build_args(quality: QualityPreference, url: &str, out_path: &Path) -> Vec<String> {
        let mut args = vec![
            "--no-playlist".to_string(),
            "--no-part".to_string(),
            "-f".to_string(),
        ];
        match quality {
            QualityPreference::Best => {
                args.push("bestvideo+bestaudio/best".to_string());
                args.push("--merge-output-format".to_string());
                args.push("mp4".to_string());
            }
            QualityPreference::Progressive => {
                args.push("best[ext=mp4]/best".to_string());
            }
        }
        args.push("-o".to_string());
        args.push(out_path.to_string_lossy().into_owned());
        args.push(url.to_string());
        args
    }
}

#[async_trait]
impl VideoFetcher for YtDlpFetcher {
    async fn fetch(&self, url: &str, dest: &Path) -> AppResult<()> {
        let parsed = Url::parse(url)
            .map_err(|e| AppError::Download(format!("invalid URL {url:?}: {e}")))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(AppError::Download(format!(
                "unsupported URL scheme {:?} in {url:?}",
                parsed.scheme()
            )));
        }

        let staging_root = match dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let staging = tempfile::Builder::new()
            .prefix(".staging-")
            .tempdir_in(staging_root)
            .map_err(|e| AppError::Download(format!("failed to create staging directory: {e}")))?;
        let staged_file = staging.path().join("video.mp4");

        let args = Self::build_args(self.quality, url, &staged_file);
        debug!("running {} {}", self.binary.display(), args.join(" "));

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                AppError::Download(format!("failed to start {}: {e}", self.binary.display()))
            })?;

        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| AppError::Download("failed to capture yt-dlp stderr".to_string()))?;
        let tail_task = tokio::spawn(collect_stderr_tail(stderr));

        let status = child
            .wait()
            .await
            .map_err(|e| AppError::Download(format!("failed waiting for yt-dlp: {e}")))?;
        let tail = tail_task.await.unwrap_or_default();

        if !status.success() {
            return Err(AppError::Download(format!(
                "yt-dlp exited with {status}: {}",
                render_tail(&tail)
            )));
        }

        let metadata = tokio::fs::metadata(&staged_file).await.map_err(|e| {
            AppError::Download(format!("download finished but output file is missing: {e}"))
        })?;
        if metadata.len() == 0 {
            return Err(AppError::Download(
                "download finished but output file is empty".to_string(),
            ));
        }

        tokio::fs::rename(&staged_file, dest)
            .await
            .map_err(|e| AppError::Download(format!("failed to move finished download: {e}")))?;

        info!("saved {}", dest.display());
        Ok(())
    }
}

/// Echo yt-dlp's stderr live, keeping a bounded tail for the error message.
async fn collect_stderr_tail(stderr: tokio::process::ChildStderr) -> VecDeque<String> {
    let mut tail = VecDeque::new();
    let mut lines = BufReader::new(stderr).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim_end().to_string();
        if line.is_empty() {
            continue;
        }
        eprintln!("{line}");
        if tail.len() >= STDERR_TAIL_LINES {
            tail.pop_front();
        }
        tail.push_back(line);
    }
    tail
}

fn render_tail(tail: &VecDeque<String>) -> String {
    if tail.is_empty() {
        return "no stderr output captured".to_string();
    }
    tail.iter().cloned().collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_quality_arguments() {
        let args = YtDlpFetcher::build_args(
            QualityPreference::Best,
            "https://example.com/watch?v=abc",
            Path::new("out/video.mp4"),
        );

        let joined = args.join(" ");
        assert!(joined.contains("-f bestvideo+bestaudio/best"));
        assert!(joined.contains("--merge-output-format mp4"));
        assert!(joined.contains("--no-playlist"));
        assert_eq!(args.last().unwrap(), "https://example.com/watch?v=abc");
    }

    #[test]
    fn test_progressive_arguments_skip_merge() {
        let args = YtDlpFetcher::build_args(
            QualityPreference::Progressive,
            "https://example.com/v",
            Path::new("out/video.mp4"),
        );

        let joined = args.join(" ");
        assert!(joined.contains("-f best[ext=mp4]/best"));
        assert!(!joined.contains("--merge-output-format"));
    }

    #[tokio::test]
    async fn test_non_http_url_is_rejected_before_spawning() {
        let fetcher = YtDlpFetcher::new(QualityPreference::Best);

        let err = fetcher
            .fetch("ftp://example.com/video", Path::new("video.mp4"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("unsupported URL scheme"));

        let err = fetcher
            .fetch("not a url at all", Path::new("video.mp4"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("invalid URL"));
    }
}
