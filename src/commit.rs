//! Commit id recorded in the build receipt.

use std::path::Path;
use std::process::Command;

use crate::error::{
    Error,
    Result,
};

/// Placeholder when no commit id can be determined.
pub const UNKNOWN_COMMIT: &str = "HEAD";

/// Runs `git rev-parse HEAD` in `repo_dir`.
pub fn git_head_sha(repo_dir: &Path) -> Result<String> {
    let output = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .current_dir(repo_dir)
        .output()
        .map_err(|e| Error::Git(format!("failed to run git: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Git(format!(
            "git rev-parse HEAD failed: {}",
            stderr.trim()
        )));
    }

    let sha = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if sha.is_empty() {
        return Err(Error::Git(
            "git rev-parse HEAD returned empty output".to_string(),
        ));
    }
    Ok(sha)
}

/// The explicit id if given, else the git HEAD of `repo_dir`, else [`UNKNOWN_COMMIT`].
pub fn determine_commit_id(explicit: Option<&str>, repo_dir: &Path) -> String {
    if let Some(id) = explicit.map(str::trim).filter(|id| !id.is_empty()) {
        return id.to_string();
    }
    match git_head_sha(repo_dir) {
        Ok(sha) => sha,
        Err(e) => {
            tracing::warn!(error = %e, "could not determine commit id, using {UNKNOWN_COMMIT}");
            UNKNOWN_COMMIT.to_string()
        }
    }
}
