use std::env;

use anyhow::Context;

use sheet_downloader::core::batch::BatchDownloader;
use sheet_downloader::core::config::{ColumnMapping, RunConfig};
use sheet_downloader::core::downloader::YtDlpFetcher;
use sheet_downloader::core::models::QualityPreference;
use sheet_downloader::parsers::{extract_entries, load_first_sheet};
use sheet_downloader::utils::{console, locator, logging};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing();

    println!("\nHi! I download the videos linked in your Excel sheet.");
    println!("Follow the prompts below.");
    println!("\n* * *");

    let Some(config) = resolve_run_config()? else {
        println!("Run cancelled.");
        return Ok(());
    };

    let table = load_first_sheet(&config.workbook)?;
    let (entries, stats) = extract_entries(&table, &config.columns);

    println!("\n* * *");
    println!("\nVideos to process: {}", entries.len());
    if stats.skipped > 0 {
        println!(
            "({} row(s) without a usable title or embedded hyperlink were skipped)",
            stats.skipped
        );
    }
    println!("\n* * *");

    let fetcher = YtDlpFetcher::new(config.quality);
    let driver = BatchDownloader::new(&fetcher, &config.output_dir);
    let report = driver.run(&entries).await?;

    let report_path = config.output_dir.join("download-report.json");
    report.save(&report_path)?;

    println!(
        "\nAll done: {} downloaded, {} skipped, {} failed.",
        report.succeeded(),
        report.skipped(),
        report.failed()
    );
    println!("Report written to {}", report_path.display());
    Ok(())
}

/// Resolve the whole run configuration interactively, before any work
/// begins. `None` means the operator declined the confirmation gate.
fn resolve_run_config() -> anyhow::Result<Option<RunConfig>> {
    let cwd = env::current_dir().context("failed to resolve working directory")?;
    let candidates = locator::find_spreadsheets(&cwd)?;

    let workbook = if candidates.len() == 1 {
        candidates[0].clone()
    } else {
        console::select_spreadsheet(&candidates)?
    };
    println!("\nSelected spreadsheet: {}", workbook.display());

    if !console::confirm_start()? {
        return Ok(None);
    }

    let output_dir = console::prompt_output_dir("videos")?;

    println!();
    let columns = ColumnMapping {
        title: console::prompt_column("containing the video titles")?,
        extra_info: console::prompt_column("containing the extra info")?,
        link: console::prompt_column("containing the download hyperlinks")?,
    };

    Ok(Some(RunConfig {
        workbook,
        columns,
        output_dir,
        quality: QualityPreference::Best,
    }))
}
