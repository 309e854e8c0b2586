use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::contract::FetchError;

pub const DEFAULT_MAX_CHARS: usize = 50_000;
pub const DEFAULT_WORKING_COPY: &str = "repo";
pub const BUNDLE_SUFFIX: &str = "_GTT";
pub const IMAGES_DIR: &str = "images";

/// Everything a single digest run needs. Paths are explicit so that several
/// runs can share a parent directory without stepping on each other.
#[derive(Debug, Clone)]
pub struct DigestConfig {
    pub repo_url: String,
    /// Where the repository is cloned. Cleared before the fetch.
    pub working_copy: PathBuf,
    /// Parent directory of the `<repo>_GTT` output bundle.
    pub output_root: PathBuf,
    /// Maximum decoded characters for a file to be inlined.
    pub max_chars: usize,
    /// Remove the working copy once extraction has finished.
    pub delete_working_copy: bool,
    pub show_progress: bool,
}

impl DigestConfig {
    /// Config with the command-line defaults, rooted in the current directory.
    pub fn new(repo_url: impl Into<String>) -> Self {
        Self {
            repo_url: repo_url.into(),
            working_copy: PathBuf::from(DEFAULT_WORKING_COPY),
            output_root: PathBuf::from("."),
            max_chars: DEFAULT_MAX_CHARS,
            delete_working_copy: true,
            show_progress: false,
        }
    }

    pub fn repo_name(&self) -> Result<String, FetchError> {
        repo_name_from_url(&self.repo_url)
    }

    pub fn trace_loaded(&self) {
        info!(
            repo_url = %self.repo_url,
            working_copy = %self.working_copy.display(),
            output_root = %self.output_root.display(),
            max_chars = self.max_chars,
            delete_working_copy = self.delete_working_copy,
            "Loaded digest config"
        );
        debug!(?self, "Digest config loaded (full debug)");
    }
}

/// Paths making up one output bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleLayout {
    /// `<output_root>/<repo>_GTT`
    pub dir: PathBuf,
    /// `<dir>/<repo>_combined.txt`
    pub combined: PathBuf,
    /// `<dir>/images`
    pub images: PathBuf,
}

impl BundleLayout {
    pub fn new(output_root: &Path, repo_name: &str) -> Self {
        let dir = output_root.join(format!("{repo_name}{BUNDLE_SUFFIX}"));
        let combined = dir.join(format!("{repo_name}_combined.txt"));
        let images = dir.join(IMAGES_DIR);
        Self {
            dir,
            combined,
            images,
        }
    }
}

/// Derives the repository name from its clone URL.
///
/// Handles https URLs, scp-like `git@host:user/repo.git` addresses and local
/// paths: trailing slashes and a single `.git` suffix are dropped, then the
/// last `/` or `:` separated segment is taken.
pub fn repo_name_from_url(url: &str) -> Result<String, FetchError> {
    let trimmed = url.trim().trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
    let name = trimmed.rsplit(['/', ':']).next().unwrap_or_default();

    if name.is_empty() || name == "." || name == ".." {
        return Err(FetchError::InvalidUrl(url.to_string()));
    }
    Ok(name.to_string())
}
