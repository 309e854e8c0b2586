//! # contract: seams and shared types for the digest pipeline
//!
//! This module defines the one pluggable seam of the pipeline, the [`Fetcher`]
//! trait, together with the plain data and error types passed between the
//! fetch, classify and extract stages.
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall`, so the pipeline can be exercised
//!   against a fake working copy without touching the network.
//! - The mock is exported behind the default `test-export-mocks` feature so
//!   integration tests under `tests/` can use it.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;
use thiserror::Error;

/// Diagnostic shown to the user whenever a repository cannot be fetched.
pub const FETCH_DIAGNOSTIC: &str = "Incorrect git url format or connection issue.\n\
Usage: Provide a valid GitHub URL like 'https://github.com/username/repository.git'";

/// Why obtaining a working copy failed. Always fatal for the run.
#[derive(Debug, Error)]
pub enum FetchError {
    /// No repository name can be derived from the URL.
    #[error("malformed repository url {0:?}")]
    InvalidUrl(String),
    /// The version-control client could not be started.
    #[error("failed to launch git: {0}")]
    Launch(#[source] std::io::Error),
    /// The clone ran but did not succeed (bad URL, unreachable host, auth).
    #[error("git clone of {url} failed (exit code {code:?})")]
    Clone { url: String, code: Option<i32> },
}

/// Errors surfaced by a digest run.
#[derive(Debug, Error)]
pub enum DigestError {
    #[error("{}", FETCH_DIAGNOSTIC)]
    Fetch(#[from] FetchError),
    #[error("failed to {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DigestError {
    /// Builds a `map_err` adapter tagging an IO error with what was attempted and where.
    pub fn io(action: &'static str, path: &Path) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.to_path_buf();
        move |source| DigestError::Io {
            action,
            path,
            source,
        }
    }

    pub fn is_fetch(&self) -> bool {
        matches!(self, DigestError::Fetch(_))
    }
}

/// Why the classifier left a file out of the digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Lives under a `.git` metadata directory.
    GitMetadata,
    /// Extension is not on the text allow-list.
    Unsupported,
    /// Decoded text is longer than the configured maximum.
    Oversized { chars: usize },
    /// The file could not be read.
    Unreadable,
}

/// Per-file routing decision of the classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// Copy verbatim into the bundle's images folder.
    Image,
    /// Inline into the combined document, carrying the decoded text.
    TextInclude(String),
    Skip(SkipReason),
}

/// Obtains a local working copy of a remote repository.
///
/// Implementations must leave `dest` holding a full checkout of the default
/// branch on success. There is no partial success: any failure is an error.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<(), FetchError>;
}
