//! Stamping the resolved version into `Cargo.toml`.
//!
//! Edits go through `toml_edit` so comments, ordering and inline tables in the
//! manifest survive.

use std::path::{
    Path,
    PathBuf,
};

use toml_edit::{
    DocumentMut,
    Item,
    value,
};

use crate::error::{
    Error,
    Result,
};

/// Which manifest field received the version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionField {
    Package,
    WorkspacePackage,
}

impl VersionField {
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionField::Package => "[package].version",
            VersionField::WorkspacePackage => "[workspace.package].version",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestUpdate {
    pub field: VersionField,
    pub previous: Option<String>,
    pub changed: bool,
}

/// Sets the version in `doc`.
///
/// `[package].version` is used when it holds a literal string. A package that
/// inherits its version, or a virtual manifest, gets
/// `[workspace.package].version` instead.
pub fn set_version(doc: &mut DocumentMut, version: &str) -> Option<ManifestUpdate> {
    let package_version = doc
        .get_mut("package")
        .and_then(|p| p.as_table_like_mut())
        .and_then(|p| p.get_mut("version"))
        .filter(|v| v.is_str());
    if let Some(item) = package_version {
        return Some(replace(item, version, VersionField::Package));
    }

    let workspace_version = doc
        .get_mut("workspace")
        .and_then(|w| w.as_table_like_mut())
        .and_then(|w| w.get_mut("package"))
        .and_then(|p| p.as_table_like_mut())
        .and_then(|p| p.get_mut("version"))
        .filter(|v| v.is_str());
    workspace_version.map(|item| replace(item, version, VersionField::WorkspacePackage))
}

fn replace(item: &mut Item, version: &str, field: VersionField) -> ManifestUpdate {
    let previous = item.as_str().map(str::to_string);
    let changed = previous.as_deref() != Some(version);
    if changed {
        let decor = item.as_value().map(|v| v.decor().clone());
        *item = value(version);
        if let (Some(decor), Some(v)) = (decor, item.as_value_mut()) {
            *v.decor_mut() = decor;
        }
    }
    ManifestUpdate {
        field,
        previous,
        changed,
    }
}

/// A manifest edit that has been computed but not yet written.
#[derive(Debug, Clone)]
pub struct ManifestPlan {
    path: PathBuf,
    doc: DocumentMut,
    pub update: ManifestUpdate,
}

impl ManifestPlan {
    /// Reads the manifest at `path` and applies `version` in memory.
    pub fn prepare(path: &Path, version: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut doc = content
            .parse::<DocumentMut>()
            .map_err(|source| Error::ParseManifest {
                path: path.to_path_buf(),
                source,
            })?;

        let update = set_version(&mut doc, version)
            .ok_or_else(|| Error::MissingManifestVersion(path.to_path_buf()))?;
        Ok(Self {
            path: path.to_path_buf(),
            doc,
            update,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the edited manifest back, if anything changed.
    pub fn write(&self) -> Result<()> {
        if !self.update.changed {
            return Ok(());
        }
        std::fs::write(&self.path, self.doc.to_string()).map_err(|source| Error::Write {
            path: self.path.clone(),
            source,
        })
    }
}
