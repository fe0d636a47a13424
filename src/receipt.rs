//! Build receipts.
//!
//! A receipt records which version, timestamp and commit an artifact belongs
//! to. Downstream builds read the timestamp back from an incoming receipt so
//! related builds share it.

use std::path::{
    Path,
    PathBuf,
};

use serde::{
    Deserialize,
    Serialize,
};

use crate::error::{
    Error,
    Result,
};
use crate::resolver::ResolvedVersion;
use crate::timestamp::BuildTimestamp;

pub const RECEIPT_FILE_NAME: &str = "build-receipt.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildReceipt {
    pub version_number: String,
    pub base_version: String,
    pub is_snapshot: bool,
    pub build_timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_timestamp_iso: Option<String>,
    pub commit_id: String,
}

impl BuildReceipt {
    pub fn new(resolved: &ResolvedVersion, commit_id: impl Into<String>) -> Self {
        let build_timestamp_iso = BuildTimestamp::parse(&resolved.build_timestamp)
            .ok()
            .map(|ts| ts.to_iso());
        Self {
            version_number: resolved.version_number.clone(),
            base_version: resolved.base_version.clone(),
            is_snapshot: resolved.is_snapshot,
            build_timestamp: resolved.build_timestamp.clone(),
            build_timestamp_iso,
            commit_id: commit_id.into(),
        }
    }

    /// Path of the receipt file inside `dir`.
    pub fn file_in(dir: &Path) -> PathBuf {
        dir.join(RECEIPT_FILE_NAME)
    }

    pub fn read_from_dir(dir: &Path) -> Result<Self> {
        let path = Self::file_in(dir);
        let content = std::fs::read_to_string(&path).map_err(|source| Error::Read {
            path: path.clone(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| Error::ParseToml { path, source })
    }

    /// Writes the receipt into `dir`, creating it if needed. Returns the file path.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir).map_err(|source| Error::Write {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = Self::file_in(dir);
        let content = toml::to_string(self)?;
        std::fs::write(&path, content).map_err(|source| Error::Write {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "wrote build receipt");
        Ok(path)
    }
}
