//! Source-control snapshotting.
//!
//! Shells out to the git client and treats its output as opaque text,
//! trailing whitespace stripped. Queries are scoped to the checked-out
//! revision of the supplied working tree. Committer (not author) dates are
//! captured so the snapshot stays independent of rebasing. Any failure to
//! launch git or a non-zero exit is fatal to the calling build step — a
//! half-populated snapshot is never produced.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// State of a working tree captured at build time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitSnapshot {
    /// True iff any tracked file differs from its committed state.
    /// Untracked files are explicitly ignored.
    pub dirty: bool,
    pub commit_hash: String,
    pub commit_date: String,
    pub committer_name: String,
    pub committer_email: String,
}

/// Resolve the repository root containing `path`, or fail if the path is
/// not inside a repository. Used by validation as the repository check.
pub fn repository_root(path: &Path) -> Result<PathBuf> {
    match run_git(path, &["rev-parse", "--show-toplevel"]) {
        Ok(root) => Ok(PathBuf::from(root)),
        Err(Error::GitCommandFailed { stderr, .. }) => Err(Error::NotARepository {
            path: path.to_path_buf(),
            reason: stderr,
        }),
        Err(other) => Err(other),
    }
}

/// Capture the full snapshot of `worktree`.
///
/// A dirty tree logs a warning: such a build should not be treated as
/// releasable.
pub fn collect(worktree: &Path) -> Result<GitSnapshot> {
    let status = run_git(worktree, &["status", "--porcelain", "--untracked-files=no"])?;
    let dirty = !status.is_empty();
    if dirty {
        tracing::warn!(
            worktree = %worktree.display(),
            "working tree has uncommitted changes; do not treat this build as releasable"
        );
    }

    let metadata = run_git(worktree, &["log", "-1", "--pretty=format:%ci%n%cn"])?;
    let (commit_date, committer_name) = match metadata.split_once('\n') {
        Some((date, name)) => (date.trim_end().to_string(), name.trim_end().to_string()),
        None => (metadata, String::new()),
    };

    let commit_hash = run_git(worktree, &["rev-parse", "HEAD"])?;
    let committer_email = run_git(worktree, &["log", "-1", "--pretty=format:%ce"])?;

    Ok(GitSnapshot {
        dirty,
        commit_hash,
        commit_date,
        committer_name,
        committer_email,
    })
}

fn run_git(worktree: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .arg("-C")
        .arg(worktree)
        .args(args)
        .output()
        .map_err(|source| Error::GitUnavailable { source })?;

    if !output.status.success() {
        return Err(Error::GitCommandFailed {
            args: args.iter().map(|s| s.to_string()).collect(),
            stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout)
        .trim_end()
        .to_string())
}
