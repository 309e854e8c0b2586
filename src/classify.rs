use std::ffi::OsStr;
use std::fs;
use std::path::{Component, Path};

use mime_guess::mime;
use tracing::{debug, warn};

use crate::contract::{Disposition, SkipReason};

/// Extensions inlined into the combined document.
pub const TEXT_EXTENSIONS: [&str; 9] = ["py", "java", "c", "cpp", "js", "html", "css", "txt", "md"];

/// Decides, per file, whether it is an image to copy, text to inline, or skipped.
#[derive(Debug, Clone, Copy)]
pub struct Classifier {
    max_chars: usize,
}

impl Classifier {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }

    /// Classifies `path`, a file somewhere under `root`.
    ///
    /// Only the position relative to `root` is considered for the `.git`
    /// check, so a working copy that itself lives under a `.git` directory is
    /// still processed.
    pub fn classify(&self, root: &Path, path: &Path) -> Disposition {
        let rel = path.strip_prefix(root).unwrap_or(path);
        if in_git_metadata(rel) {
            return Disposition::Skip(SkipReason::GitMetadata);
        }
        if is_image(path) {
            return Disposition::Image;
        }
        if !has_text_extension(path) {
            return Disposition::Skip(SkipReason::Unsupported);
        }

        let content = match read_lossy(path) {
            Ok(content) => content,
            Err(e) => {
                warn!(error = ?e, path = %path.display(), "Skipping unreadable file");
                return Disposition::Skip(SkipReason::Unreadable);
            }
        };
        let chars = content.chars().count();
        if chars > self.max_chars {
            debug!(path = %path.display(), chars, max_chars = self.max_chars, "Skipping oversized file");
            return Disposition::Skip(SkipReason::Oversized { chars });
        }
        Disposition::TextInclude(content)
    }
}

fn in_git_metadata(rel: &Path) -> bool {
    rel.components()
        .any(|c| matches!(c, Component::Normal(name) if name == ".git"))
}

/// Image by MIME type guessed from the extension, never by content.
pub fn is_image(path: &Path) -> bool {
    mime_guess::from_path(path)
        .first()
        .is_some_and(|m| m.type_() == mime::IMAGE)
}

fn has_text_extension(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| TEXT_EXTENSIONS.contains(&ext))
}

/// Reads a file as UTF-8, replacing invalid sequences with U+FFFD.
pub fn read_lossy(path: &Path) -> std::io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(root: &Path, rel: &str, content: &[u8]) -> std::path::PathBuf {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn classifies_by_git_path_mime_extension_and_size() {
        struct TestCase {
            name: &'static str,
            rel: &'static str,
            content: Vec<u8>,
            expected: Disposition,
        }

        let tmp = tempdir().unwrap();
        let classifier = Classifier::new(10);

        let cases = vec![
            TestCase {
                name: "python source within limit",
                rel: "main.py",
                content: b"print(1)".to_vec(),
                expected: Disposition::TextInclude("print(1)".into()),
            },
            TestCase {
                name: "exactly at the limit",
                rel: "docs/notes.md",
                content: b"0123456789".to_vec(),
                expected: Disposition::TextInclude("0123456789".into()),
            },
            TestCase {
                name: "one over the limit",
                rel: "big.js",
                content: b"0123456789a".to_vec(),
                expected: Disposition::Skip(SkipReason::Oversized { chars: 11 }),
            },
            TestCase {
                name: "png is an image",
                rel: "assets/logo.png",
                content: vec![0x89, b'P', b'N', b'G'],
                expected: Disposition::Image,
            },
            TestCase {
                name: "svg is an image regardless of size",
                rel: "icon.svg",
                content: b"<svg>................................</svg>".to_vec(),
                expected: Disposition::Image,
            },
            TestCase {
                name: "anything under .git is skipped first",
                rel: ".git/objects/readme.md",
                content: b"x".to_vec(),
                expected: Disposition::Skip(SkipReason::GitMetadata),
            },
            TestCase {
                name: "image under .git is skipped too",
                rel: "sub/.git/logo.png",
                content: b"x".to_vec(),
                expected: Disposition::Skip(SkipReason::GitMetadata),
            },
            TestCase {
                name: ".github is not git metadata",
                rel: ".github/workflow.md",
                content: b"ci".to_vec(),
                expected: Disposition::TextInclude("ci".into()),
            },
            TestCase {
                name: "rust is not on the allow-list",
                rel: "lib.rs",
                content: b"fn x(){}".to_vec(),
                expected: Disposition::Skip(SkipReason::Unsupported),
            },
            TestCase {
                name: "extension match is case-sensitive",
                rel: "SHOUT.PY",
                content: b"x".to_vec(),
                expected: Disposition::Skip(SkipReason::Unsupported),
            },
            TestCase {
                name: "no extension",
                rel: "Makefile",
                content: b"all:".to_vec(),
                expected: Disposition::Skip(SkipReason::Unsupported),
            },
        ];

        for tc in cases {
            let path = write(tmp.path(), tc.rel, &tc.content);
            assert_eq!(
                classifier.classify(tmp.path(), &path),
                tc.expected,
                "{}",
                tc.name
            );
        }
    }

    #[test]
    fn invalid_utf8_is_replaced_not_fatal() {
        let tmp = tempdir().unwrap();
        let path = write(tmp.path(), "latin1.txt", b"caf\xe9 ok");

        match Classifier::new(100).classify(tmp.path(), &path) {
            Disposition::TextInclude(text) => {
                assert_eq!(text, "caf\u{FFFD} ok");
            }
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn length_is_measured_in_characters_not_bytes() {
        let tmp = tempdir().unwrap();
        // 4 characters, 8 bytes
        let path = write(tmp.path(), "wide.txt", "éééé".as_bytes());

        assert_eq!(
            Classifier::new(4).classify(tmp.path(), &path),
            Disposition::TextInclude("éééé".into())
        );
    }

    #[test]
    fn unreadable_text_candidate_is_skipped() {
        let tmp = tempdir().unwrap();
        // a directory carrying a source extension cannot be read as a file
        let path = tmp.path().join("module.py");
        fs::create_dir_all(&path).unwrap();

        assert_eq!(
            Classifier::new(100).classify(tmp.path(), &path),
            Disposition::Skip(SkipReason::Unreadable)
        );
    }

    #[test]
    fn working_copy_below_a_git_directory_is_still_processed() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().join(".git/checkout");
        let path = write(&root, "main.py", b"print(1)");

        assert_eq!(
            Classifier::new(100).classify(&root, &path),
            Disposition::TextInclude("print(1)".into())
        );
    }
}
