//! Collaborators that supply resolver inputs from the filesystem.

use std::path::{
    Path,
    PathBuf,
};

use crate::error::{
    Error,
    Result,
};
use crate::receipt::BuildReceipt;

/// Supplies the base version, e.g. `7.0`.
pub trait BaseVersionSource {
    fn base_version(&self) -> Result<String>;
}

/// Supplies a timestamp stamped by an upstream build, if there is one.
pub trait TimestampReceiptSource {
    fn incoming_timestamp(&self) -> Result<Option<String>>;
}

/// A plain-text file holding the base version.
#[derive(Debug, Clone)]
pub struct VersionFile {
    path: PathBuf,
}

impl VersionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BaseVersionSource for VersionFile {
    fn base_version(&self) -> Result<String> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| Error::Read {
            path: self.path.clone(),
            source,
        })?;
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(Error::EmptyBaseVersion(self.path.clone()));
        }
        Ok(trimmed.to_string())
    }
}

/// Directory where promoted builds drop the receipt of the build they promote.
#[derive(Debug, Clone)]
pub struct IncomingReceiptDir {
    dir: PathBuf,
}

impl IncomingReceiptDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl TimestampReceiptSource for IncomingReceiptDir {
    fn incoming_timestamp(&self) -> Result<Option<String>> {
        if !BuildReceipt::file_in(&self.dir).exists() {
            return Ok(None);
        }
        let receipt = BuildReceipt::read_from_dir(&self.dir)?;
        tracing::debug!(dir = %self.dir.display(), "read incoming build receipt");
        Ok(Some(receipt.build_timestamp))
    }
}
