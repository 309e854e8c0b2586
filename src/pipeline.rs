//! Coordinating module for the fetch-extract-summarise pipeline.

use std::fs;
use std::path::Path;

use tracing::{debug, error, info, warn};

use crate::config::{BundleLayout, DigestConfig};
use crate::contract::{DigestError, Fetcher};
use crate::extract::{ExtractReport, Extractor};
use crate::summary::{summarize, Summary};

/// Outcome of a successful digest run.
#[derive(Debug)]
pub struct DigestReport {
    pub repo_name: String,
    pub bundle: BundleLayout,
    pub extract: ExtractReport,
    pub summary: Summary,
    pub working_copy_deleted: bool,
}

/// Points in a run reported to the caller as they happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// The fetch is about to start.
    Fetching,
    /// The working copy is in place.
    Fetched,
}

/// Runs one digest without stage notifications. See [`run_digest_with`].
pub async fn run_digest<F>(config: &DigestConfig, fetcher: &F) -> Result<DigestReport, DigestError>
where
    F: Fetcher + ?Sized,
{
    run_digest_with(config, fetcher, |_| {}).await
}

/// Runs one digest: clear stale directories, fetch, extract, clean up, count.
///
/// A fetch failure leaves neither a working copy nor an output bundle behind.
/// Directories from a previous run are always removed first, so results never
/// mix with an earlier partial bundle. `on_stage` is called around the fetch.
pub async fn run_digest_with<F, S>(
    config: &DigestConfig,
    fetcher: &F,
    mut on_stage: S,
) -> Result<DigestReport, DigestError>
where
    F: Fetcher + ?Sized,
    S: FnMut(Stage),
{
    let repo_name = config.repo_name()?;
    let bundle = BundleLayout::new(&config.output_root, &repo_name);
    info!(repo_url = %config.repo_url, repo_name = %repo_name, "Starting digest");

    remove_stale(&config.working_copy)?;
    remove_stale(&bundle.dir)?;

    on_stage(Stage::Fetching);
    if let Err(e) = fetcher.fetch(&config.repo_url, &config.working_copy).await {
        error!(error = %e, repo_url = %config.repo_url, "Fetch failed");
        discard_partial(&config.working_copy);
        return Err(e.into());
    }
    on_stage(Stage::Fetched);

    fs::create_dir_all(&bundle.dir).map_err(DigestError::io("create", &bundle.dir))?;

    let extract = Extractor::new(config.max_chars)
        .with_progress(config.show_progress)
        .extract(&config.working_copy, &bundle)?;

    let working_copy_deleted = if config.delete_working_copy {
        fs::remove_dir_all(&config.working_copy)
            .map_err(DigestError::io("remove", &config.working_copy))?;
        info!(path = %config.working_copy.display(), "Deleted working copy");
        true
    } else {
        false
    };

    let summary = summarize(&bundle.combined)?;

    Ok(DigestReport {
        repo_name,
        bundle,
        extract,
        summary,
        working_copy_deleted,
    })
}

fn remove_stale(path: &Path) -> Result<(), DigestError> {
    if !path.exists() {
        return Ok(());
    }
    fs::remove_dir_all(path).map_err(DigestError::io("remove stale", path))?;
    debug!(path = %path.display(), "Removed stale directory");
    Ok(())
}

fn discard_partial(path: &Path) {
    if !path.exists() {
        return;
    }
    if let Err(e) = fs::remove_dir_all(path) {
        warn!(error = ?e, path = %path.display(), "Failed to remove partial working copy");
    }
}
