//! Builds throwaway git repositories for tests that clone for real.

use std::fs;
use std::path::Path;
use std::process::Command;

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args([
            "-c",
            "user.name=Test",
            "-c",
            "user.email=test@example.com",
            "-c",
            "commit.gpgsign=false",
            "-c",
            "init.defaultBranch=main",
        ])
        .args(args)
        .current_dir(dir)
        .status()
        .expect("git must be installed to run clone tests");
    assert!(status.success(), "git {args:?} failed with {status}");
}

/// Creates a committed repository at `dir` holding a README, a source file
/// and an image.
pub fn init_repo(dir: &Path) {
    fs::create_dir_all(dir.join("assets")).unwrap();
    fs::write(dir.join("README.md"), "Hello world").unwrap();
    fs::write(dir.join("main.py"), "print(1)").unwrap();
    fs::write(dir.join("assets/logo.png"), "png").unwrap();

    git(dir, &["init", "-q"]);
    git(dir, &["add", "."]);
    git(dir, &["commit", "-q", "-m", "initial commit"]);
}
