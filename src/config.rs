//! Settings from `Cargo.toml` metadata, overridable on the command line.
//!
//! ```toml
//! [package.metadata.build-version]
//! version-file = "version.txt"
//! receipt-dir = "target"
//! incoming-receipt-dir = "incoming-distributions"
//! ```
//!
//! `[workspace.metadata.build-version]` is read too; the package table wins.

use std::path::{
    Path,
    PathBuf,
};

use serde::Deserialize;

use crate::error::{
    Error,
    Result,
};

pub const DEFAULT_VERSION_FILE: &str = "version.txt";
pub const DEFAULT_RECEIPT_DIR: &str = "target";
pub const DEFAULT_INCOMING_RECEIPT_DIR: &str = "incoming-distributions";

#[derive(Debug, Default, Deserialize)]
struct Manifest {
    package: Option<MetadataHolder>,
    workspace: Option<MetadataHolder>,
}

#[derive(Debug, Default, Deserialize)]
struct MetadataHolder {
    metadata: Option<Metadata>,
}

#[derive(Debug, Default, Deserialize)]
struct Metadata {
    #[serde(rename = "build-version")]
    build_version: Option<MetadataSettings>,
}

/// The `build-version` metadata table. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MetadataSettings {
    pub version_file: Option<PathBuf>,
    pub receipt_dir: Option<PathBuf>,
    pub incoming_receipt_dir: Option<PathBuf>,
}

impl MetadataSettings {
    /// Reads `<workspace>/Cargo.toml`. A missing manifest yields empty settings.
    pub fn load(workspace: &Path) -> Result<Self> {
        let path = workspace.join("Cargo.toml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path).map_err(|source| Error::Read {
            path: path.clone(),
            source,
        })?;
        Self::parse(&content).map_err(|source| Error::ParseToml { path, source })
    }

    fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        let manifest: Manifest = toml::from_str(content)?;
        let table = |holder: Option<MetadataHolder>| {
            holder
                .and_then(|h| h.metadata)
                .and_then(|m| m.build_version)
                .unwrap_or_default()
        };
        Ok(table(manifest.package).or(table(manifest.workspace)))
    }

    /// Keys set in `self` win; the rest come from `fallback`.
    pub fn or(self, fallback: Self) -> Self {
        Self {
            version_file: self.version_file.or(fallback.version_file),
            receipt_dir: self.receipt_dir.or(fallback.receipt_dir),
            incoming_receipt_dir: self.incoming_receipt_dir.or(fallback.incoming_receipt_dir),
        }
    }
}

/// Paths joined onto the workspace directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub workspace: PathBuf,
    pub version_file: PathBuf,
    pub receipt_dir: PathBuf,
    pub incoming_receipt_dir: PathBuf,
}

impl Settings {
    /// Layers `overrides` over the manifest metadata over the defaults.
    pub fn resolve(workspace: &Path, overrides: MetadataSettings) -> Result<Self> {
        let merged = overrides.or(MetadataSettings::load(workspace)?);
        let under_workspace = |path: Option<PathBuf>, default: &str| {
            workspace.join(path.unwrap_or_else(|| PathBuf::from(default)))
        };

        Ok(Self {
            workspace: workspace.to_path_buf(),
            version_file: under_workspace(merged.version_file, DEFAULT_VERSION_FILE),
            receipt_dir: under_workspace(merged.receipt_dir, DEFAULT_RECEIPT_DIR),
            incoming_receipt_dir: under_workspace(
                merged.incoming_receipt_dir,
                DEFAULT_INCOMING_RECEIPT_DIR,
            ),
        })
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.workspace.join("Cargo.toml")
    }
}
