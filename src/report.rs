//! Human-facing output.
//!
//! Lifecycle lines go to stderr so stdout only carries the result, which is
//! either the bare version number or `cargo:rustc-env` lines.

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::resolver::ResolvedVersion;
use crate::signals::CiServer;

/// Prints lifecycle lines on stderr unless quiet.
#[derive(Debug, Default)]
pub struct Reporter {
    quiet: bool,
    captured: Option<RefCell<Vec<String>>>,
}

impl Reporter {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            captured: None,
        }
    }

    /// A reporter that keeps its lines in memory instead of printing them.
    pub fn capturing(quiet: bool) -> Self {
        Self {
            quiet,
            captured: Some(RefCell::new(Vec::new())),
        }
    }

    /// Lines kept by a capturing reporter, in emission order.
    pub fn lines(&self) -> Vec<String> {
        self.captured
            .as_ref()
            .map(|lines| lines.borrow().clone())
            .unwrap_or_default()
    }

    pub fn println(&self, line: &str) {
        if !self.quiet {
            self.emit(line);
        }
    }

    fn emit(&self, line: &str) {
        match &self.captured {
            Some(lines) => lines.borrow_mut().push(line.to_string()),
            None => eprintln!("{line}"),
        }
    }

    pub fn log_start_parameters(
        &self,
        task_names: &[String],
        properties: &BTreeMap<String, String>,
    ) {
        self.println(&start_parameters_line(task_names, properties));
    }

    pub fn log_build_version(&self, resolved: &ResolvedVersion, ci_server: Option<CiServer>) {
        self.println(&build_version_line(resolved));
        if let Some(server) = ci_server {
            // CI servers scan the build log for these, so quiet does not apply.
            self.emit(&ci_status_annotation(server, &resolved.version_number));
        }
    }
}

pub fn start_parameters_line(
    task_names: &[String],
    properties: &BTreeMap<String, String>,
) -> String {
    let properties = properties
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Invocation tasks: [{}]\nInvocation properties: {{{properties}}}",
        task_names.join(", ")
    )
}

pub fn build_version_line(resolved: &ResolvedVersion) -> String {
    format!(
        "Version: {} (base version: {}, timestamp: {}, snapshot: {})",
        resolved.version_number,
        resolved.base_version,
        resolved.build_timestamp,
        resolved.is_snapshot
    )
}

/// Service message that tags the CI build with the promoted version.
pub fn ci_status_annotation(server: CiServer, version_number: &str) -> String {
    match server {
        CiServer::TeamCity => format!(
            "##teamcity[buildStatus text='{{build.status.text}}, Promoted version {}']",
            teamcity_escape(version_number)
        ),
        CiServer::GitHubActions => format!("::notice title=Promoted version::{version_number}"),
    }
}

fn teamcity_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '|' | '\'' | '[' | ']' => {
                escaped.push('|');
                escaped.push(c);
            }
            '\n' => escaped.push_str("|n"),
            '\r' => escaped.push_str("|r"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// `cargo:rustc-env` lines for build scripts that embed the version.
pub fn cargo_env_lines(resolved: &ResolvedVersion, commit_id: &str) -> Vec<String> {
    [
        ("BUILD_VERSION", resolved.version_number.as_str()),
        ("BUILD_BASE_VERSION", resolved.base_version.as_str()),
        (
            "BUILD_IS_SNAPSHOT",
            if resolved.is_snapshot { "true" } else { "false" },
        ),
        ("BUILD_TIMESTAMP", resolved.build_timestamp.as_str()),
        ("BUILD_COMMIT_ID", commit_id),
    ]
    .into_iter()
    .map(|(key, value)| format!("cargo:rustc-env={key}={value}"))
    .collect()
}
