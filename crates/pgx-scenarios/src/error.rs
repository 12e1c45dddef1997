//! Error types for scenario lookup and loading.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while resolving or loading connection scenarios.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// Scenario name did not match any known identifier.
    #[error("unknown scenario '{name}'")]
    UnknownScenario {
        /// Name supplied by the caller.
        name: String,
    },
    /// Base profile name did not match any built-in profile.
    #[error("unknown scenario profile '{name}'")]
    UnknownProfile {
        /// Name supplied by the caller.
        name: String,
    },
    /// A per-scenario override could not be interpreted.
    #[error("invalid override for scenario '{scenario}': {reason}")]
    InvalidOverride {
        /// Scenario the override targeted.
        scenario: String,
        /// Human-readable reason for the rejection.
        reason: String,
    },
    /// An active scenario is missing a required value.
    #[error("scenario '{scenario}' has an empty {field}")]
    EmptyField {
        /// Scenario that failed validation.
        scenario: String,
        /// Field that was empty.
        field: &'static str,
    },
    /// Reading the overlay file failed.
    #[error("failed to read scenario file {}", .path.display())]
    ReadFile {
        /// Path of the overlay file.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// Overlay file was not valid scenario JSON.
    #[error("failed to parse scenario file {}", .path.display())]
    ParseFile {
        /// Path of the overlay file.
        path: PathBuf,
        /// Underlying serde error.
        source: serde_json::Error,
    },
}

/// Convenience alias for scenario results.
pub type ScenarioResult<T> = Result<T, ScenarioError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn scenario_error_display_and_source() {
        let unknown = ScenarioError::UnknownScenario {
            name: "ipv6".to_string(),
        };
        assert_eq!(unknown.to_string(), "unknown scenario 'ipv6'");
        assert!(unknown.source().is_none());

        let empty = ScenarioError::EmptyField {
            scenario: "tcp".to_string(),
            field: "user",
        };
        assert_eq!(empty.to_string(), "scenario 'tcp' has an empty user");

        let read = ScenarioError::ReadFile {
            path: PathBuf::from("scenarios.json"),
            source: io::Error::other("io"),
        };
        assert_eq!(read.to_string(), "failed to read scenario file scenarios.json");
        assert!(read.source().is_some());
    }
}
