use std::ffi::OsString;

use anyhow::Result;
use clap::{ArgAction, Parser};

use crate::config::{DigestConfig, DEFAULT_MAX_CHARS};
use crate::download::GitFetcher;
use crate::pipeline::{run_digest_with, DigestReport, Stage};

/// CLI for git-to-text: flatten a git repository into one text digest.
#[derive(Parser, Debug)]
#[clap(
    name = "git-to-text",
    version,
    about = "Extract a git repository's README, source files and folder structure into a single text file"
)]
pub struct Cli {
    /// Repository URL, e.g. https://github.com/username/repository.git
    pub repo_url: String,

    /// Delete the cloned repository folder after extraction (true/false)
    #[clap(
        long = "delete-folder",
        value_name = "BOOL",
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub delete_folder: bool,

    /// Maximum character count per file to include in the extraction
    #[clap(
        long = "maxchar",
        visible_alias = "max-chars",
        value_name = "N",
        default_value_t = DEFAULT_MAX_CHARS
    )]
    pub max_chars: usize,
}

impl Cli {
    /// Parses the process arguments, accepting the single-dash `-df` and
    /// `-maxchar` spellings.
    pub fn parse_args() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }

    pub fn into_config(self) -> DigestConfig {
        DigestConfig {
            max_chars: self.max_chars,
            delete_working_copy: self.delete_folder,
            show_progress: true,
            ..DigestConfig::new(self.repo_url)
        }
    }
}

/// Rewrites `-df` and `-maxchar` (with or without `=value`) to their long forms.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    const LEGACY: [(&str, &str); 2] = [("-df", "--delete-folder"), ("-maxchar", "--maxchar")];

    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            let Some(text) = arg.to_str() else {
                return arg;
            };
            for (short, long) in LEGACY {
                if text == short {
                    return OsString::from(long);
                }
                if let Some(value) = text.strip_prefix(short).and_then(|r| r.strip_prefix('=')) {
                    return OsString::from(format!("{long}={value}"));
                }
            }
            arg
        })
        .collect()
}

/// CLI entrypoint shared by `main` and integration tests.
pub async fn run(cli: Cli) -> Result<()> {
    let config = cli.into_config();
    config.trace_loaded();

    let report = run_digest_with(&config, &GitFetcher::new(), |stage| match stage {
        Stage::Fetching => println!("Cloning repository..."),
        Stage::Fetched => println!(
            "Repository cloned to {}\n",
            config.working_copy.display()
        ),
    })
    .await?;
    print_report(&config, &report);
    Ok(())
}

fn print_report(config: &DigestConfig, report: &DigestReport) {
    println!(
        "\nAll code and README files have been extracted to {}",
        report.bundle.combined.display()
    );
    println!(
        "Images have been extracted to {} folder",
        report.bundle.images.display()
    );
    if report.working_copy_deleted {
        println!(
            "\nDeleted the repository folder: {}",
            config.working_copy.display()
        );
    }
    println!(
        "\nSummary: The {}_combined.txt file contains {} words.",
        report.repo_name, report.summary.word_count
    );
    println!(
        "Token count (estimated as 2x word count): {} tokens.\n\
         Note: This is a rough estimate and may vary depending on actual tokenization.",
        report.summary.estimated_tokens
    );
}
