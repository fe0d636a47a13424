//! End-to-end resolution against a workspace on disk.

use std::path::Path;

use cargo_build_version::config::{
    MetadataSettings,
    Settings,
};
use cargo_build_version::invocation::{
    ReleaseProperties,
    gather_inputs,
};
use cargo_build_version::signals::EnvironmentSignals;
use cargo_build_version::source::{
    IncomingReceiptDir,
    VersionFile,
};
use cargo_build_version::{
    BuildReceipt,
    Error,
    FixedClock,
    ResolveError,
    ResolvedVersion,
    manifest,
    resolve,
};
use chrono::{
    TimeZone,
    Utc,
};

fn workspace(version: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("version.txt"), format!("{version}\n")).unwrap();
    std::fs::write(
        dir.path().join("Cargo.toml"),
        r#"[package]
name = "demo"
version = "0.0.0"
edition = "2024"
"#,
    )
    .unwrap();
    dir
}

fn run(
    root: &Path,
    properties: &ReleaseProperties,
    tasks: &[String],
    signals: &EnvironmentSignals,
    clock: &FixedClock,
) -> cargo_build_version::Result<ResolvedVersion> {
    let settings = Settings::resolve(root, MetadataSettings::default())?;
    let inputs = gather_inputs(
        properties,
        tasks,
        signals,
        &VersionFile::new(&settings.version_file),
        &IncomingReceiptDir::new(&settings.incoming_receipt_dir),
    )?;
    let resolved = resolve(&inputs, clock)?;
    BuildReceipt::new(&resolved, "0123abcd").write_to_dir(&settings.receipt_dir)?;
    Ok(resolved)
}

fn ci() -> EnvironmentSignals {
    EnvironmentSignals {
        is_ci: true,
        ci_server: None,
    }
}

fn at(h: u32, m: u32, s: u32) -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2024, 1, 2, h, m, s).unwrap())
}

#[test]
fn ci_snapshot_writes_receipt() {
    let ws = workspace("7.0");
    let resolved = run(
        ws.path(),
        &ReleaseProperties::default(),
        &[],
        &ci(),
        &at(3, 4, 5),
    )
    .unwrap();

    assert_eq!(resolved.version_number, "7.0-20240102030405");
    assert!(resolved.is_snapshot);

    let receipt = BuildReceipt::read_from_dir(&ws.path().join("target")).unwrap();
    assert_eq!(receipt.version_number, "7.0-20240102030405");
    assert_eq!(receipt.base_version, "7.0");
    assert!(receipt.is_snapshot);
    assert_eq!(receipt.build_timestamp, "20240102030405");
    assert_eq!(receipt.commit_id, "0123abcd");
}

#[test]
fn promoted_build_reuses_upstream_timestamp() {
    let upstream = workspace("7.0");
    let first = run(
        upstream.path(),
        &ReleaseProperties::default(),
        &[],
        &ci(),
        &at(3, 4, 5),
    )
    .unwrap();

    // The promotion job receives the upstream distributions with their receipt.
    let promotion = workspace("7.0");
    let incoming = promotion.path().join("incoming-distributions");
    BuildReceipt::read_from_dir(&upstream.path().join("target"))
        .unwrap()
        .write_to_dir(&incoming)
        .unwrap();

    let properties = ReleaseProperties {
        version_qualifier: Some("beta".into()),
        build_timestamp: Some("20991231000000".into()),
        ..ReleaseProperties::default()
    };
    let promoted = run(promotion.path(), &properties, &[], &ci(), &at(18, 0, 0)).unwrap();

    assert_eq!(promoted.build_timestamp, first.build_timestamp);
    assert_eq!(promoted.version_number, "7.0-beta-20240102030405");
}

#[test]
fn ignoring_incoming_receipt_uses_override() {
    let ws = workspace("7.0");
    let incoming = ws.path().join("incoming-distributions");
    let upstream = ResolvedVersion {
        version_number: "7.0-20230101000000".into(),
        base_version: "7.0".into(),
        is_snapshot: true,
        build_timestamp: "20230101000000".into(),
    };
    BuildReceipt::new(&upstream, "feedface")
        .write_to_dir(&incoming)
        .unwrap();

    let properties = ReleaseProperties {
        build_timestamp: Some("20240615120000".into()),
        ignore_incoming_build_receipt: true,
        ..ReleaseProperties::default()
    };
    let resolved = run(ws.path(), &properties, &[], &ci(), &at(3, 4, 5)).unwrap();
    assert_eq!(resolved.build_timestamp, "20240615120000");
}

#[test]
fn repeated_local_builds_share_a_version() {
    let ws = workspace("7.0");
    let local = EnvironmentSignals::default();

    let defaults = ReleaseProperties::default();

    let morning = run(ws.path(), &defaults, &[], &local, &at(8, 0, 0)).unwrap();
    let evening = run(ws.path(), &defaults, &[], &local, &at(20, 30, 0)).unwrap();
    assert_eq!(morning.version_number, "7.0-20240102000000");
    assert_eq!(morning, evening);

    let install = run(
        ws.path(),
        &defaults,
        &["installAll".to_string()],
        &local,
        &at(20, 30, 0),
    )
    .unwrap();
    assert_eq!(install.version_number, "7.0-20240102203000");
}

#[test]
fn conflicting_release_flags_write_nothing() {
    let ws = workspace("7.0");
    let properties = ReleaseProperties {
        final_release: true,
        milestone_number: Some("2".into()),
        ..ReleaseProperties::default()
    };

    let err = run(ws.path(), &properties, &[], &ci(), &at(3, 4, 5)).unwrap_err();
    assert!(matches!(
        err,
        Error::Resolve(ResolveError::InvalidInputCombination)
    ));
    assert!(!BuildReceipt::file_in(&ws.path().join("target")).exists());
}

#[test]
fn malformed_override_fails() {
    let ws = workspace("7.0");
    let properties = ReleaseProperties {
        build_timestamp: Some("2024-01-02".into()),
        ..ReleaseProperties::default()
    };
    let err = run(ws.path(), &properties, &[], &ci(), &at(3, 4, 5)).unwrap_err();
    assert!(matches!(
        err,
        Error::Resolve(ResolveError::MalformedTimestamp { .. })
    ));
}

#[test]
fn final_release_stamps_manifest() {
    let ws = workspace("7.0.1");
    let properties = ReleaseProperties {
        final_release: true,
        ..ReleaseProperties::default()
    };
    let resolved = run(ws.path(), &properties, &[], &ci(), &at(3, 4, 5)).unwrap();
    assert_eq!(resolved.version_number, "7.0.1");

    let manifest_path = ws.path().join("Cargo.toml");
    manifest::ManifestPlan::prepare(&manifest_path, &resolved.version_number)
        .unwrap()
        .write()
        .unwrap();
    let content = std::fs::read_to_string(manifest_path).unwrap();
    assert!(content.contains("version = \"7.0.1\""));
    assert!(content.contains("name = \"demo\""));
}
