//! Cargo subcommand that resolves the version of a build.
//!
//! The version is derived from:
//! 1. `--final-release`, `--rc-number` or `--milestone-number` (at most one)
//! 2. `--version-qualifier` for snapshot builds
//! 3. The base version in `version.txt`
//! 4. The build timestamp: incoming build receipt, `--build-timestamp`, or now
//!
//! A build receipt is written to the receipt directory for later build steps.

use std::path::PathBuf;

use anyhow::{
    Context,
    Result,
};
use cargo_build_version::config::MetadataSettings;
use cargo_build_version::invocation::ReleaseProperties;
use cargo_build_version::report::Reporter;
use cargo_build_version::signals::EnvironmentSignals;
use cargo_build_version::{
    OutputFormat,
    RunOptions,
    SystemClock,
    run,
};
use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(
    name = "cargo-build-version",
    about = "Resolve the build version and write a build receipt",
    bin_name = "cargo",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Parser, Debug)]
enum Command {
    #[command(name = "build-version")]
    BuildVersion(BuildVersionArgs),
}

#[derive(Parser, Debug)]
struct BuildVersionArgs {
    /// This is the final release build
    #[arg(long)]
    final_release: bool,

    /// Release candidate number
    #[arg(long, value_name = "N")]
    rc_number: Option<String>,

    /// Milestone number
    #[arg(long, value_name = "N")]
    milestone_number: Option<String>,

    /// Qualifier for snapshot versions, e.g. "beta"
    #[arg(long, value_name = "QUALIFIER")]
    version_qualifier: Option<String>,

    /// Build timestamp override (yyyyMMddHHmmss, UTC)
    #[arg(long, env = "BUILD_TIMESTAMP", value_name = "TIMESTAMP")]
    build_timestamp: Option<String>,

    /// Do not reuse the timestamp of an incoming build receipt
    #[arg(long)]
    ignore_incoming_build_receipt: bool,

    /// Task names of this invocation; "install" and "installAll" keep full timestamp precision
    #[arg(long = "task", value_name = "NAME")]
    tasks: Vec<String>,

    /// Log invocation parameters and the promoted version
    #[arg(long)]
    promotion_build: bool,

    /// Commit id for the build receipt (defaults to git HEAD)
    #[arg(long, env = "BUILD_COMMIT_ID", value_name = "ID")]
    commit_id: Option<String>,

    /// Path to workspace root
    #[arg(long, default_value = ".")]
    workspace_path: PathBuf,

    /// File holding the base version
    #[arg(long)]
    version_file: Option<PathBuf>,

    /// Directory the build receipt is written to
    #[arg(long)]
    receipt_dir: Option<PathBuf>,

    /// Directory searched for an incoming build receipt
    #[arg(long)]
    incoming_receipt_dir: Option<PathBuf>,

    /// Write the resolved version into Cargo.toml
    #[arg(long)]
    set_manifest_version: bool,

    /// Resolve and report without writing any files
    #[arg(long)]
    dry_run: bool,

    /// What to print on stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Suppress lifecycle output
    #[arg(long)]
    quiet: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl BuildVersionArgs {
    fn release_properties(&self) -> ReleaseProperties {
        ReleaseProperties {
            final_release: self.final_release,
            rc_number: self.rc_number.clone(),
            milestone_number: self.milestone_number.clone(),
            version_qualifier: self.version_qualifier.clone(),
            build_timestamp: self.build_timestamp.clone(),
            ignore_incoming_build_receipt: self.ignore_incoming_build_receipt,
        }
    }

    fn setting_overrides(&self) -> MetadataSettings {
        MetadataSettings {
            version_file: self.version_file.clone(),
            receipt_dir: self.receipt_dir.clone(),
            incoming_receipt_dir: self.incoming_receipt_dir.clone(),
        }
    }

    fn run_options(&self) -> RunOptions {
        RunOptions {
            workspace: self.workspace_path.clone(),
            overrides: self.setting_overrides(),
            properties: self.release_properties(),
            tasks: self.tasks.clone(),
            promotion_build: self.promotion_build,
            commit_id: self.commit_id.clone(),
            set_manifest_version: self.set_manifest_version,
            dry_run: self.dry_run,
            format: self.format,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::BuildVersion(args)) => {
            init_tracing(if args.verbose { Level::DEBUG } else { Level::INFO });
            build_version(args)
        }
        None => {
            // When invoked without a subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

fn init_tracing(level: Level) {
    let env_filter = EnvFilter::try_from_env("BUILD_VERSION_LOG")
        .unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    // Fails only when a global subscriber is already installed; keep that one.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}

fn build_version(args: BuildVersionArgs) -> Result<()> {
    let reporter = Reporter::new(args.quiet);
    let mut stdout = std::io::stdout().lock();
    run(
        &args.run_options(),
        &EnvironmentSignals::from_env(),
        &SystemClock,
        &reporter,
        &mut stdout,
    )
    .context("Failed to resolve build version")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> BuildVersionArgs {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Some(Command::BuildVersion(args)) => args,
            None => panic!("expected build-version subcommand"),
        }
    }

    #[test]
    fn parses_release_flags() {
        let args = parse(&[
            "cargo",
            "build-version",
            "--rc-number",
            "3",
            "--task",
            "build",
            "--task",
            ":install",
        ]);
        assert_eq!(args.rc_number.as_deref(), Some("3"));
        assert_eq!(args.tasks, vec!["build", ":install"]);
        assert_eq!(args.format, OutputFormat::Text);
        assert_eq!(args.workspace_path, PathBuf::from("."));
    }

    #[test]
    fn release_properties_carry_flags() {
        let args = parse(&[
            "cargo",
            "build-version",
            "--final-release",
            "--ignore-incoming-build-receipt",
            "--format",
            "cargo-env",
        ]);
        let properties = args.release_properties();
        assert!(properties.final_release);
        assert!(properties.ignore_incoming_build_receipt);
        assert_eq!(args.format, OutputFormat::CargoEnv);
    }

    #[test]
    fn path_overrides() {
        let args = parse(&[
            "cargo",
            "build-version",
            "--version-file",
            "VERSION",
            "--receipt-dir",
            "out",
        ]);
        let overrides = args.setting_overrides();
        assert_eq!(overrides.version_file, Some(PathBuf::from("VERSION")));
        assert_eq!(overrides.receipt_dir, Some(PathBuf::from("out")));
        assert_eq!(overrides.incoming_receipt_dir, None);
    }

    #[test]
    fn tracing_can_be_initialized_twice() {
        init_tracing(Level::INFO);
        init_tracing(Level::DEBUG);
    }

    #[test]
    fn run_options_carry_behavior_flags() {
        let args = parse(&[
            "cargo",
            "build-version",
            "--promotion-build",
            "--set-manifest-version",
            "--dry-run",
            "--commit-id",
            "abc123",
            "--workspace-path",
            "ws",
        ]);
        let options = args.run_options();
        assert!(options.promotion_build);
        assert!(options.set_manifest_version);
        assert!(options.dry_run);
        assert_eq!(options.commit_id.as_deref(), Some("abc123"));
        assert_eq!(options.workspace, PathBuf::from("ws"));
    }
}
