//! git-to-text: flatten a git repository into a single text digest.
//!
//! A run clones the repository, writes its folder structure, README and every
//! small enough source file into `<repo>_GTT/<repo>_combined.txt`, copies image
//! assets into `<repo>_GTT/images/`, and reports a rough token estimate.
//!
//! The stages live in their own modules and are wired together by
//! [`pipeline::run_digest`]; [`cli`] is the command-line surface over it.

pub mod classify;
pub mod cli;
pub mod config;
pub mod contract;
pub mod download;
pub mod extract;
pub mod pipeline;
pub mod summary;
pub mod tree;

pub use cli::{run, Cli};
pub use config::DigestConfig;
pub use contract::{DigestError, Disposition, FetchError, Fetcher};
pub use pipeline::{run_digest, run_digest_with, DigestReport, Stage};

/// Installs the stderr log subscriber, filtered by `RUST_LOG` (default `warn`).
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
