//! Error types for version resolution and its collaborators.

use std::path::PathBuf;

/// Failures of the resolver itself. Both are fatal to the invocation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error(
        "Cannot set any combination of milestoneNumber, rcNumber and finalRelease at the same time"
    )]
    InvalidInputCombination,

    #[error("malformed build timestamp '{value}': {reason} (expected yyyyMMddHHmmss)")]
    MalformedTimestamp { value: String, reason: String },
}

/// Errors raised while gathering inputs or persisting results.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("version file {} is empty", .0.display())]
    EmptyBaseVersion(PathBuf),

    #[error("failed to parse {}: {source}", path.display())]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize build receipt: {0}")]
    SerializeReceipt(#[from] toml::ser::Error),

    #[error("failed to parse manifest {}: {source}", path.display())]
    ParseManifest {
        path: PathBuf,
        #[source]
        source: toml_edit::TomlError,
    },

    #[error("manifest {} has neither [package].version nor [workspace.package].version", .0.display())]
    MissingManifestVersion(PathBuf),

    #[error("failed to write output: {0}")]
    Output(#[source] std::io::Error),

    #[error("git error: {0}")]
    Git(String),
}

pub type Result<T> = std::result::Result<T, Error>;
