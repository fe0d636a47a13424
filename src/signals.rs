//! Environment signals that influence timestamp precision and reporting.

/// Task names that mark an install invocation, with or without the root `:`.
const INSTALL_TASKS: [&str; 2] = ["install", "installAll"];

/// A build server whose log output understands status annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CiServer {
    TeamCity,
    GitHubActions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentSignals {
    pub is_ci: bool,
    pub ci_server: Option<CiServer>,
}

impl EnvironmentSignals {
    /// Reads the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds signals from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let ci_server = if lookup("TEAMCITY_VERSION").is_some() {
            Some(CiServer::TeamCity)
        } else if lookup("GITHUB_ACTIONS").as_deref() == Some("true") {
            Some(CiServer::GitHubActions)
        } else {
            None
        };

        Self {
            is_ci: lookup("CI").is_some(),
            ci_server,
        }
    }
}

/// True when any of `task_names` is an install task.
pub fn is_install_invocation<S: AsRef<str>>(task_names: &[S]) -> bool {
    task_names.iter().any(|task| {
        let task = task.as_ref();
        let name = task.strip_prefix(':').unwrap_or(task);
        INSTALL_TASKS.contains(&name)
    })
}
