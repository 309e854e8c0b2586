//! Directory walking shared by the folder-structure listing and the extractor.
//!
//! Entries are visited depth-first and sorted by file name within each
//! directory, so both the structure section and the per-file body come out in
//! the same order on every platform. Symbolic links are not followed.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

fn sorted_walk(root: &Path) -> WalkDir {
    WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
}

/// Writes an indented listing of every file and directory under `root`.
///
/// Each entry produces one line: two spaces per depth level (offset by
/// `indent`), a dash, then the entry's base name.
pub fn write_structure<W: Write>(root: &Path, sink: &mut W, indent: usize) -> io::Result<()> {
    for entry in sorted_walk(root) {
        let entry = entry?;
        let depth = indent + entry.depth() - 1;
        writeln!(
            sink,
            "{}- {}",
            "  ".repeat(depth),
            entry.file_name().to_string_lossy()
        )?;
    }
    Ok(())
}

/// Every non-directory entry under `root`, in walk order.
///
/// Symbolic links pointing at directories count as directories: they are
/// neither descended into nor returned.
pub fn list_files(root: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in sorted_walk(root) {
        let entry = entry?;
        if entry.file_type().is_dir() {
            continue;
        }
        if entry.path_is_symlink() && entry.path().is_dir() {
            debug!(path = %entry.path().display(), "Skipping symlinked directory");
            continue;
        }
        files.push(entry.into_path());
    }
    debug!(root = %root.display(), count = files.len(), "Enumerated files");
    Ok(files)
}

/// `rel` rendered with `/` separators, as used in file headers.
pub fn display_relative(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
