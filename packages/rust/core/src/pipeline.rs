//! End-to-end sync pipeline: query → fetch blocks → render → extract → write.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{info, instrument};

use notionsync_notion::NotionClient;
use notionsync_shared::{NotionSyncError, Result, SyncConfig};

use crate::metadata::extract_metadata;
use crate::writer::write_document;

/// Result of a sync run.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    /// Pages matched by the status filter.
    pub pages_matched: usize,
    /// Files written, in processing order.
    pub files_written: Vec<PathBuf>,
    /// How many files used the category/title fallback path.
    pub fallback_paths: usize,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called before a page's blocks are fetched.
    fn page_started(&self, page_id: &str, current: usize, total: usize);
    /// Called after a page's file is written.
    fn page_written(&self, path: &str, current: usize, total: usize);
    /// Called when the pipeline completes.
    fn done(&self, report: &SyncReport);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn page_started(&self, _page_id: &str, _current: usize, _total: usize) {}
    fn page_written(&self, _path: &str, _current: usize, _total: usize) {}
    fn done(&self, _report: &SyncReport) {}
}

/// Run the full sync.
///
/// 1. Create the output root
/// 2. Query the database for pages matching the status filter
/// 3. For each page, in order: fetch blocks, render, extract metadata, write
///
/// Pages are processed strictly one after another. The first error aborts
/// the run; files already written stay on disk.
#[instrument(skip_all, fields(output_dir = %config.output_dir.display()))]
pub async fn sync(
    config: &SyncConfig,
    client: &NotionClient,
    progress: &dyn ProgressReporter,
) -> Result<SyncReport> {
    let start = Instant::now();

    std::fs::create_dir_all(&config.output_dir)
        .map_err(|e| NotionSyncError::io(&config.output_dir, e))?;

    progress.phase(&format!(
        "Fetching pages with {} = '{}'",
        config.status_property, config.status_value
    ));
    let pages = client.query_database().await?;

    let mut report = SyncReport {
        pages_matched: pages.len(),
        ..SyncReport::default()
    };

    if pages.is_empty() {
        info!(status = %config.status_value, "no matching pages, nothing to sync");
        report.elapsed = start.elapsed();
        progress.done(&report);
        return Ok(report);
    }

    let total = pages.len();
    for (i, page) in pages.iter().enumerate() {
        info!(page_id = %page.id, "processing page");
        progress.page_started(&page.id, i + 1, total);

        let blocks = client.fetch_blocks(&page.id).await?;
        let body = notionsync_markdown::render_blocks(&blocks);
        let meta = extract_metadata(page);

        let written = write_document(&config.output_dir, &meta, &body)?;
        if written.fallback {
            report.fallback_paths += 1;
        }

        info!(path = %written.path.display(), "saved");
        progress.page_written(&written.path.display().to_string(), i + 1, total);
        report.files_written.push(written.path);
    }

    report.elapsed = start.elapsed();
    progress.done(&report);

    info!(
        pages = report.pages_matched,
        written = report.files_written.len(),
        fallback_paths = report.fallback_paths,
        elapsed_ms = report.elapsed.as_millis(),
        "sync complete"
    );

    Ok(report)
}
