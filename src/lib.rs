//! Build version resolution for cargo projects.
//!
//! Computes the version of a build from:
//! 1. Release flags: final release, release candidate, milestone, qualifier
//! 2. A base version read from a version file (`version.txt`)
//! 3. A build timestamp taken from an incoming build receipt, an explicit
//!    override, or the clock
//!
//! and records the outcome in a build receipt for later build steps.

pub mod commit;
pub mod config;
pub mod error;
pub mod invocation;
pub mod manifest;
pub mod receipt;
pub mod release;
pub mod report;
pub mod resolver;
pub mod signals;
pub mod source;
pub mod timestamp;
pub mod workflow;

pub use error::{
    Error,
    ResolveError,
    Result,
};
pub use receipt::BuildReceipt;
pub use release::Release;
pub use resolver::{
    ResolvedVersion,
    VersionInputs,
    resolve,
    resolve_timestamp,
    resolve_version_number,
    validate,
};
pub use timestamp::{
    BuildTimestamp,
    Clock,
    FixedClock,
    SystemClock,
};
pub use workflow::{
    OutputFormat,
    RunOptions,
    run,
};
