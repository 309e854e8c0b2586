//! Extraction of a working copy into the combined document and images folder.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::classify::{read_lossy, Classifier};
use crate::config::BundleLayout;
use crate::contract::{DigestError, Disposition};
use crate::tree;

/// README file names, checked at the working copy root in priority order.
pub const README_CANDIDATES: [&str; 4] = ["README.md", "README.txt", "readme.md", "readme.txt"];

const STRUCTURE_HEADER: &str = "\n--- Repository Folder Structure ---\n";
const STRUCTURE_FOOTER: &str = "\n-----------------------------------\n\n";
const README_HEADER: &str = "\n--- README FILE ---\n";
const SECTION_FOOTER: &str = "\n-------------------\n\n";

/// What an extraction run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractReport {
    pub files_seen: usize,
    pub text_files: usize,
    pub images: usize,
    pub skipped: usize,
    pub readme: Option<PathBuf>,
}

pub struct Extractor {
    classifier: Classifier,
    show_progress: bool,
}

impl Extractor {
    pub fn new(max_chars: usize) -> Self {
        Self {
            classifier: Classifier::new(max_chars),
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Writes the combined document for `working_copy` into `bundle`.
    ///
    /// The bundle directory must exist; the images folder is created on the
    /// first image. An existing combined document is truncated.
    pub fn extract(
        &self,
        working_copy: &Path,
        bundle: &BundleLayout,
    ) -> Result<ExtractReport, DigestError> {
        info!(path = %working_copy.display(), "Extracting files from working copy");
        let files = tree::list_files(working_copy)
            .map_err(DigestError::io("list files under", working_copy))?;

        let mut doc = CombinedDocument::create(&bundle.combined)?;
        let mut report = ExtractReport {
            files_seen: files.len(),
            ..ExtractReport::default()
        };

        doc.write(STRUCTURE_HEADER)?;
        tree::write_structure(working_copy, &mut doc.out, 0)
            .map_err(DigestError::io("write folder structure to", &bundle.combined))?;
        doc.write(STRUCTURE_FOOTER)?;

        if let Some(readme) = find_readme(working_copy) {
            let text = read_lossy(&readme).map_err(DigestError::io("read", &readme))?;
            doc.write(README_HEADER)?;
            doc.write(&text)?;
            doc.write(SECTION_FOOTER)?;
            debug!(path = %readme.display(), "Wrote README section");
            report.readme = Some(readme);
        }

        let progress = self.progress_bar(files.len());
        for path in &files {
            match self.classifier.classify(working_copy, path) {
                Disposition::Image => {
                    copy_image(path, &bundle.images)?;
                    report.images += 1;
                }
                Disposition::TextInclude(content) => {
                    let rel = path.strip_prefix(working_copy).unwrap_or(path);
                    doc.write(&format!("\n--- File: {} ---\n", tree::display_relative(rel)))?;
                    doc.write(&content)?;
                    doc.write(SECTION_FOOTER)?;
                    report.text_files += 1;
                }
                Disposition::Skip(reason) => {
                    debug!(path = %path.display(), ?reason, "Skipped file");
                    report.skipped += 1;
                }
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        doc.finish()?;
        info!(
            files = report.files_seen,
            text_files = report.text_files,
            images = report.images,
            skipped = report.skipped,
            "Completed extraction"
        );
        Ok(report)
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len as u64);
        if let Ok(style) = ProgressStyle::with_template("{msg} {wide_bar} {pos}/{len}") {
            pb.set_style(style);
        }
        pb.set_message("Extracting files");
        pb
    }
}

/// First README variant present at the root of `working_copy`.
pub fn find_readme(working_copy: &Path) -> Option<PathBuf> {
    README_CANDIDATES
        .iter()
        .map(|name| working_copy.join(name))
        .find(|path| path.is_file())
}

/// Copies an image into `images_dir` under its base name, replacing any
/// earlier image with the same name.
fn copy_image(path: &Path, images_dir: &Path) -> Result<(), DigestError> {
    fs::create_dir_all(images_dir).map_err(DigestError::io("create", images_dir))?;
    let Some(name) = path.file_name() else {
        return Ok(());
    };
    let target = images_dir.join(name);
    fs::copy(path, &target).map_err(DigestError::io("copy image to", &target))?;
    debug!(from = %path.display(), to = %target.display(), "Copied image");
    Ok(())
}

struct CombinedDocument {
    out: BufWriter<File>,
    path: PathBuf,
}

impl CombinedDocument {
    fn create(path: &Path) -> Result<Self, DigestError> {
        let file = File::create(path).map_err(DigestError::io("create", path))?;
        Ok(Self {
            out: BufWriter::new(file),
            path: path.to_path_buf(),
        })
    }

    fn write(&mut self, text: &str) -> Result<(), DigestError> {
        self.out
            .write_all(text.as_bytes())
            .map_err(DigestError::io("write", &self.path))
    }

    fn finish(mut self) -> Result<(), DigestError> {
        self.out.flush().map_err(DigestError::io("flush", &self.path))
    }
}
