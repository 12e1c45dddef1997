//! Test fixtures and environment helpers.

use std::path::Path;
use std::process::Command;

/// Set to `1`, `true` or `yes` to run scenarios against the operator's server.
pub const LIVE_SUITE_VAR: &str = "PGX_TEST_LIVE";

/// Returns `true` if a Docker daemon is reachable for integration tests.
#[must_use]
pub fn docker_available() -> bool {
    docker_available_with_host(std::env::var("DOCKER_HOST").ok())
}

fn docker_available_with_host(host: Option<String>) -> bool {
    if let Some(host) = host {
        if let Some(path) = host.strip_prefix("unix://") {
            return Path::new(path).exists();
        }
        return true;
    }

    Path::new("/var/run/docker.sock").exists()
        || Command::new("docker")
            .args(["info"])
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
}

/// Returns `true` when the operator asked for the live scenario suite.
#[must_use]
pub fn live_suite_requested() -> bool {
    live_suite_flag(std::env::var(LIVE_SUITE_VAR).ok().as_deref())
}

fn live_suite_flag(value: Option<&str>) -> bool {
    value.is_some_and(|value| {
        matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes"
        )
    })
}
