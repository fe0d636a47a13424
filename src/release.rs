//! Release identity of a build.

use std::fmt;

/// What kind of build is being versioned.
///
/// The first three variants are release markers and are mutually exclusive on
/// the command line. The two snapshot variants embed the build timestamp in
/// the version string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Release {
    Final,
    ReleaseCandidate(String),
    Milestone(String),
    QualifiedSnapshot(String),
    Snapshot,
}

impl Release {
    /// Picks the release kind by priority: final, rc, milestone, qualifier.
    ///
    /// Does not check that the markers are exclusive; callers validate first.
    pub fn from_markers(
        final_release: bool,
        rc_number: Option<&str>,
        milestone_number: Option<&str>,
        version_qualifier: Option<&str>,
    ) -> Self {
        if final_release {
            Release::Final
        } else if let Some(rc) = rc_number {
            Release::ReleaseCandidate(rc.to_string())
        } else if let Some(milestone) = milestone_number {
            Release::Milestone(milestone.to_string())
        } else if let Some(qualifier) = version_qualifier {
            Release::QualifiedSnapshot(qualifier.to_string())
        } else {
            Release::Snapshot
        }
    }

    pub fn is_snapshot(&self) -> bool {
        matches!(self, Release::QualifiedSnapshot(_) | Release::Snapshot)
    }

    /// Formats the full version number. `timestamp` is only used by snapshots.
    pub fn version_number(&self, base_version: &str, timestamp: &str) -> String {
        match self {
            Release::Final => base_version.to_string(),
            Release::ReleaseCandidate(rc) => format!("{base_version}-rc-{rc}"),
            Release::Milestone(milestone) => format!("{base_version}-milestone-{milestone}"),
            Release::QualifiedSnapshot(qualifier) => {
                format!("{base_version}-{qualifier}-{timestamp}")
            }
            Release::Snapshot => format!("{base_version}-{timestamp}"),
        }
    }
}

impl fmt::Display for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Release::Final => write!(f, "final release"),
            Release::ReleaseCandidate(rc) => write!(f, "release candidate {rc}"),
            Release::Milestone(milestone) => write!(f, "milestone {milestone}"),
            Release::QualifiedSnapshot(qualifier) => write!(f, "{qualifier} snapshot"),
            Release::Snapshot => write!(f, "snapshot"),
        }
    }
}
