//! Version resolution.
//!
//! Pure decision procedure: every input, including the incoming receipt
//! timestamp and the environment signals, is gathered into [`VersionInputs`]
//! before anything here runs. The only ambient dependency is the [`Clock`].

use crate::error::ResolveError;
use crate::release::Release;
use crate::timestamp::{
    BuildTimestamp,
    Clock,
};

/// Everything the resolver needs for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionInputs {
    pub final_release: bool,
    pub rc_number: Option<String>,
    pub milestone_number: Option<String>,
    pub version_qualifier: Option<String>,
    /// Trimmed, non-empty contents of the version file.
    pub base_version: String,
    /// Override in `yyyyMMddHHmmss` form.
    pub explicit_timestamp: Option<String>,
    pub ignore_incoming_receipt: bool,
    /// Timestamp from an upstream build receipt, copied verbatim.
    pub incoming_receipt_timestamp: Option<String>,
    pub is_ci_run: bool,
    pub is_install_invocation: bool,
}

impl VersionInputs {
    pub fn new(base_version: impl Into<String>) -> Self {
        Self {
            base_version: base_version.into(),
            ..Self::default()
        }
    }

    fn release(&self) -> Release {
        Release::from_markers(
            self.final_release,
            self.rc_number.as_deref(),
            self.milestone_number.as_deref(),
            self.version_qualifier.as_deref(),
        )
    }
}

/// The outcome handed to the receipt writer and the reporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion {
    pub version_number: String,
    pub base_version: String,
    pub is_snapshot: bool,
    pub build_timestamp: String,
}

/// Fails when more than one release marker is set.
pub fn validate(inputs: &VersionInputs) -> Result<(), ResolveError> {
    let markers = [
        inputs.final_release,
        inputs.rc_number.is_some(),
        inputs.milestone_number.is_some(),
    ];
    if markers.into_iter().filter(|present| *present).count() > 1 {
        return Err(ResolveError::InvalidInputCombination);
    }
    Ok(())
}

/// Picks the build timestamp.
///
/// Incoming receipt (unless ignored), then explicit override, then now. Local
/// builds outside CI and install runs are truncated to the start of the day so
/// repeated builds on one day share a version.
pub fn resolve_timestamp(
    inputs: &VersionInputs,
    clock: &dyn Clock,
) -> Result<String, ResolveError> {
    if !inputs.ignore_incoming_receipt
        && let Some(incoming) = &inputs.incoming_receipt_timestamp
    {
        return Ok(incoming.clone());
    }

    let timestamp = if let Some(explicit) = &inputs.explicit_timestamp {
        BuildTimestamp::parse(explicit)?
    } else if inputs.is_ci_run || inputs.is_install_invocation {
        BuildTimestamp::at(clock.now())
    } else {
        BuildTimestamp::start_of_day(clock.now())
    };
    Ok(timestamp.to_string())
}

/// Formats the version number for an already resolved timestamp.
pub fn resolve_version_number(inputs: &VersionInputs, build_timestamp: &str) -> String {
    inputs
        .release()
        .version_number(&inputs.base_version, build_timestamp)
}

/// Validates, then resolves timestamp and version number in that order.
pub fn resolve(
    inputs: &VersionInputs,
    clock: &dyn Clock,
) -> Result<ResolvedVersion, ResolveError> {
    validate(inputs)?;

    let build_timestamp = resolve_timestamp(inputs, clock)?;
    let release = inputs.release();
    tracing::debug!(%release, %build_timestamp, "resolving version");

    Ok(ResolvedVersion {
        version_number: release.version_number(&inputs.base_version, &build_timestamp),
        base_version: inputs.base_version.clone(),
        is_snapshot: release.is_snapshot(),
        build_timestamp,
    })
}
