//! One `cargo build-version` invocation, end to end.
//!
//! Everything that can fail on input is settled before the first write: flags
//! are validated, sources read, the version resolved and the manifest edit
//! planned. Only then are the manifest and the receipt written.

use std::io::Write;
use std::path::PathBuf;

use crate::commit::determine_commit_id;
use crate::config::{
    MetadataSettings,
    Settings,
};
use crate::error::{
    Error,
    Result,
};
use crate::invocation::{
    ReleaseProperties,
    gather_inputs,
};
use crate::manifest::ManifestPlan;
use crate::receipt::BuildReceipt;
use crate::report::{
    Reporter,
    cargo_env_lines,
};
use crate::resolver::{
    ResolvedVersion,
    resolve,
};
use crate::signals::EnvironmentSignals;
use crate::source::{
    IncomingReceiptDir,
    VersionFile,
};
use crate::timestamp::Clock;

/// What to print on stdout.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// The version number alone
    #[default]
    Text,
    /// `cargo:rustc-env` lines for build scripts
    CargoEnv,
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub workspace: PathBuf,
    pub overrides: MetadataSettings,
    pub properties: ReleaseProperties,
    pub tasks: Vec<String>,
    pub promotion_build: bool,
    pub commit_id: Option<String>,
    pub set_manifest_version: bool,
    pub dry_run: bool,
    pub format: OutputFormat,
}

/// Resolves the version, persists it and prints the result to `out`.
///
/// Lifecycle lines go to `reporter`; `out` only receives the result.
pub fn run(
    options: &RunOptions,
    signals: &EnvironmentSignals,
    clock: &dyn Clock,
    reporter: &Reporter,
    out: &mut dyn Write,
) -> Result<ResolvedVersion> {
    if options.promotion_build {
        reporter.log_start_parameters(&options.tasks, &options.properties.to_map());
    }

    let settings = Settings::resolve(&options.workspace, options.overrides.clone())?;
    tracing::debug!(?settings, ?signals, "resolved settings");

    let inputs = gather_inputs(
        &options.properties,
        &options.tasks,
        signals,
        &VersionFile::new(&settings.version_file),
        &IncomingReceiptDir::new(&settings.incoming_receipt_dir),
    )?;
    if let Some(incoming) = &inputs.incoming_receipt_timestamp {
        reporter.println(&format!("Using timestamp from incoming build receipt: {incoming}"));
    }

    let resolved = resolve(&inputs, clock)?;
    let commit_id = determine_commit_id(options.commit_id.as_deref(), &settings.workspace);

    let manifest = if options.set_manifest_version {
        Some(ManifestPlan::prepare(&settings.manifest_path(), &resolved.version_number)?)
    } else {
        None
    };
    let receipt = BuildReceipt::new(&resolved, &commit_id);

    if options.dry_run {
        reporter.println(&format!(
            "Would write build receipt to {}",
            BuildReceipt::file_in(&settings.receipt_dir).display()
        ));
    } else {
        if let Some(plan) = &manifest {
            plan.write()?;
        }
        // The receipt goes last: its presence means the run completed.
        let path = receipt.write_to_dir(&settings.receipt_dir)?;
        reporter.println(&format!("Wrote build receipt to {}", path.display()));
    }

    if let Some(plan) = manifest.as_ref().filter(|plan| plan.update.changed) {
        let verb = if options.dry_run { "Would set" } else { "Set" };
        reporter.println(&format!(
            "{verb} {} to {} in {}",
            plan.update.field.as_str(),
            resolved.version_number,
            plan.path().display()
        ));
    }

    if options.promotion_build {
        reporter.log_build_version(&resolved, signals.ci_server);
    }

    write_result(out, options.format, &resolved, &commit_id).map_err(Error::Output)?;
    Ok(resolved)
}

fn write_result(
    out: &mut dyn Write,
    format: OutputFormat,
    resolved: &ResolvedVersion,
    commit_id: &str,
) -> std::io::Result<()> {
    match format {
        OutputFormat::Text => writeln!(out, "{}", resolved.version_number)?,
        OutputFormat::CargoEnv => {
            for line in cargo_env_lines(resolved, commit_id) {
                writeln!(out, "{line}")?;
            }
        }
    }
    out.flush()
}
