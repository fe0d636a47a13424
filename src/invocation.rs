//! Assembling [`VersionInputs`] for one invocation.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::resolver::{
    VersionInputs,
    validate,
};
use crate::signals::{
    EnvironmentSignals,
    is_install_invocation,
};
use crate::source::{
    BaseVersionSource,
    TimestampReceiptSource,
};

/// Release flags as given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseProperties {
    pub final_release: bool,
    pub rc_number: Option<String>,
    pub milestone_number: Option<String>,
    pub version_qualifier: Option<String>,
    pub build_timestamp: Option<String>,
    pub ignore_incoming_build_receipt: bool,
}

impl ReleaseProperties {
    /// The properties that were set, keyed by their property names.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        let flags = [
            ("finalRelease", self.final_release.then(|| "true".to_string())),
            ("rcNumber", self.rc_number.clone()),
            ("milestoneNumber", self.milestone_number.clone()),
            ("versionQualifier", self.version_qualifier.clone()),
            ("buildTimestamp", self.build_timestamp.clone()),
            (
                "ignoreIncomingBuildReceipt",
                self.ignore_incoming_build_receipt.then(|| "true".to_string()),
            ),
        ];
        flags
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| (name.to_string(), v)))
            .collect()
    }
}

/// Collects everything the resolver needs.
///
/// Release flags are checked before any source is read. The incoming receipt
/// is not read at all when it is ignored.
pub fn gather_inputs(
    properties: &ReleaseProperties,
    task_names: &[String],
    signals: &EnvironmentSignals,
    base_version: &dyn BaseVersionSource,
    incoming: &dyn TimestampReceiptSource,
) -> Result<VersionInputs> {
    let mut inputs = VersionInputs {
        final_release: properties.final_release,
        rc_number: properties.rc_number.clone(),
        milestone_number: properties.milestone_number.clone(),
        version_qualifier: properties.version_qualifier.clone(),
        explicit_timestamp: properties.build_timestamp.clone(),
        ignore_incoming_receipt: properties.ignore_incoming_build_receipt,
        is_ci_run: signals.is_ci,
        is_install_invocation: is_install_invocation(task_names),
        ..VersionInputs::default()
    };
    validate(&inputs)?;

    inputs.base_version = base_version.base_version()?;
    if !inputs.ignore_incoming_receipt {
        inputs.incoming_receipt_timestamp = incoming.incoming_timestamp()?;
    }
    Ok(inputs)
}
