use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::contract::{FetchError, Fetcher};

/// Fetches repositories by shelling out to the `git` client.
#[derive(Debug, Clone, Default)]
pub struct GitFetcher;

impl GitFetcher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Fetcher for GitFetcher {
    /// `git clone <url> <dest>` of the default branch.
    ///
    /// Credential prompts are disabled so an authentication failure ends the
    /// clone instead of waiting on a terminal.
    async fn fetch(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        let status = Command::new("git")
            .arg("clone")
            .arg("--quiet")
            .arg("--")
            .arg(url)
            .arg(dest)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .status()
            .await;

        match status {
            Ok(s) if s.success() => {
                tracing::info!(
                    repo_url = url,
                    path = %dest.display(),
                    status = ?s,
                    "Successfully cloned git repository"
                );
                Ok(())
            }
            Ok(s) => {
                tracing::error!(
                    repo_url = url,
                    path = %dest.display(),
                    "Git exited with non-zero code: {}", s
                );
                Err(FetchError::Clone {
                    url: url.to_string(),
                    code: s.code(),
                })
            }
            Err(e) => {
                tracing::error!(
                    error = ?e,
                    repo_url = url,
                    path = %dest.display(),
                    "Failed to launch git process"
                );
                Err(FetchError::Launch(e))
            }
        }
    }
}
