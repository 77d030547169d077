//! End-to-end fetch pipeline: sitemap → cache → extract → convert → write.
//!
//! URLs are processed strictly sequentially. Every per-URL condition is
//! converted into a [`UrlOutcome`] at this boundary; nothing propagates
//! into the batch loop, and the run never stops early. Only a sitemap
//! retrieval failure is fatal.

use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use skillpress_fetch::{Fetcher, paths, sitemap};
use skillpress_shared::{FetchConfig, Result, SkillPressError};

// ---------------------------------------------------------------------------
// Outcomes and summary
// ---------------------------------------------------------------------------

/// Terminal outcome for one URL's processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlOutcome {
    /// Fetched, extracted, converted, and written.
    Ok,
    /// Output already present and no force flag; nothing attempted.
    Skip,
    /// Exhausted download attempts, or local I/O failed.
    Fail,
    /// Page retrieved but no recognizable article body. Expected for
    /// listing/index pages; distinct from [`UrlOutcome::Fail`].
    NoContent,
}

impl UrlOutcome {
    /// Short status tag for logs and console output.
    pub fn label(self) -> &'static str {
        match self {
            UrlOutcome::Ok => "ok",
            UrlOutcome::Skip => "skip",
            UrlOutcome::Fail => "fail",
            UrlOutcome::NoContent => "no-content",
        }
    }
}

impl std::fmt::Display for UrlOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-run tally of URL outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchSummary {
    /// URLs converted and written this run.
    pub ok: usize,
    /// URLs whose output already existed.
    pub skipped: usize,
    /// URLs that exhausted their download attempts.
    pub failed: usize,
    /// URLs without a recognizable article body.
    pub no_content: usize,
}

impl FetchSummary {
    fn record(&mut self, outcome: UrlOutcome) {
        match outcome {
            UrlOutcome::Ok => self.ok += 1,
            UrlOutcome::Skip => self.skipped += 1,
            UrlOutcome::Fail => self.failed += 1,
            UrlOutcome::NoContent => self.no_content += 1,
        }
    }

    /// Total number of URLs processed.
    pub fn total(&self) -> usize {
        self.ok + self.skipped + self.failed + self.no_content
    }
}

// ---------------------------------------------------------------------------
// Progress reporting
// ---------------------------------------------------------------------------

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each URL is processed.
    fn url_done(&self, short_url: &str, outcome: UrlOutcome, current: usize, total: usize);
    /// Called when the run completes.
    fn done(&self, summary: &FetchSummary);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn url_done(&self, _short_url: &str, _outcome: UrlOutcome, _current: usize, _total: usize) {}
    fn done(&self, _summary: &FetchSummary) {}
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Run the full fetch pipeline.
///
/// 1. Fetch and parse the sitemap (fatal on failure)
/// 2. Create the cache and output roots
/// 3. Process each URL: fetch → extract → convert → write
/// 4. Return the outcome tally
#[instrument(skip_all, fields(sitemap = %config.sitemap_url, force))]
pub async fn run_fetch(
    config: &FetchConfig,
    force: bool,
    progress: &dyn ProgressReporter,
) -> Result<FetchSummary> {
    progress.phase("Fetching sitemap");
    let fetcher = Fetcher::new(config)?;
    let urls = sitemap::fetch_sitemap(fetcher.client(), &config.sitemap_url).await?;

    info!(url_count = urls.len(), "sitemap fetched");

    let cache_root = PathBuf::from(&config.cache_dir);
    let output_root = PathBuf::from(&config.output_dir);
    std::fs::create_dir_all(&cache_root).map_err(|e| SkillPressError::io(&cache_root, e))?;
    std::fs::create_dir_all(&output_root).map_err(|e| SkillPressError::io(&output_root, e))?;

    progress.phase("Processing articles");
    let mut summary = FetchSummary::default();
    let total = urls.len();

    for (i, url) in urls.iter().enumerate() {
        let outcome = process_url(&fetcher, url, &output_root, force).await;
        summary.record(outcome);
        tracing::debug!(url, outcome = %outcome, "url processed");

        let short = url.strip_prefix(config.base_url.as_str()).unwrap_or(url);
        progress.url_done(short, outcome, i + 1, total);
    }

    progress.done(&summary);
    info!(
        ok = summary.ok,
        skipped = summary.skipped,
        failed = summary.failed,
        no_content = summary.no_content,
        "fetch run complete"
    );

    Ok(summary)
}

/// Process a single URL through fetch → extract → convert → write.
///
/// Every failure mode becomes an outcome here; one URL's failure never
/// aborts the batch.
async fn process_url(fetcher: &Fetcher, url: &str, output_root: &Path, force: bool) -> UrlOutcome {
    let output_path = paths::output_path(url, output_root);

    // Already converted and not forcing: no network, no parsing
    if !force && output_path.exists() {
        return UrlOutcome::Skip;
    }

    let Some(cache_path) = fetcher.fetch(url, force).await else {
        return UrlOutcome::Fail;
    };

    let html = match std::fs::read(&cache_path) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            warn!(url, error = %e, "failed to read cached document");
            return UrlOutcome::Fail;
        }
    };

    let Some(article) = skillpress_markdown::extract_article(&html) else {
        return UrlOutcome::NoContent;
    };

    let body = skillpress_markdown::to_markdown(&article.content_html);

    if let Some(parent) = output_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            warn!(url, error = %e, "failed to create output directory");
            return UrlOutcome::Fail;
        }
    }

    let document = format!("# {}\n\n{}\n", article.title, body);
    if let Err(e) = std::fs::write(&output_path, document) {
        warn!(url, error = %e, "failed to write markdown output");
        return UrlOutcome::Fail;
    }

    UrlOutcome::Ok
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
