//! Immutable table mapping every scenario to its connection settings.
//!
//! # Design
//! - One slot per [`ScenarioId`], so lookups by identifier are total.
//! - Disabled scenarios are an explicit variant that the harness reports as skipped.
//! - No `&mut` access; `with_entry` consumes the registry while it is being assembled.

use serde::{Deserialize, Serialize};

use crate::error::ScenarioResult;
use crate::model::{ConnectionScenarioConfig, ScenarioId, TlsPolicy};

const DEFAULT_SOCKET_DIR: &str = "/private/tmp";
const LOOPBACK: &str = "127.0.0.1";
const TEST_DATABASE: &str = "pgx_test";
const MD5_USER: &str = "pgx_md5";
const PASSWORD_USER: &str = "pgx_pw";
const TRUST_USER: &str = "pgx_none";
const UNKNOWN_USER: &str = "invalid";
const TEST_PASSWORD: &str = "secret";

/// Registry slot for a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScenarioEntry {
    /// Scenario runs with the attached settings.
    Active(ConnectionScenarioConfig),
    /// Scenario is intentionally not run in this environment.
    Disabled,
}

impl ScenarioEntry {
    /// Settings for an active scenario.
    #[must_use]
    pub const fn config(&self) -> Option<&ConnectionScenarioConfig> {
        match self {
            Self::Active(config) => Some(config),
            Self::Disabled => None,
        }
    }

    /// Whether the harness should skip this scenario.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled)
    }
}

/// Connection scenarios for one test run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioRegistry {
    entries: [ScenarioEntry; ScenarioId::ALL.len()],
}

impl ScenarioRegistry {
    /// Registry with every scenario disabled.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            entries: std::array::from_fn(|_| ScenarioEntry::Disabled),
        }
    }

    /// Shipped profile: the socket-based default and the custom dialer are active,
    /// every scenario needing dedicated roles or a TLS-enabled server is disabled.
    #[must_use]
    pub fn baseline() -> Self {
        Self::disabled()
            .with_entry(
                ScenarioId::Default,
                ScenarioEntry::Active(md5_config(DEFAULT_SOCKET_DIR)),
            )
            .with_entry(
                ScenarioId::CustomDialer,
                ScenarioEntry::Active(md5_config(LOOPBACK)),
            )
    }

    /// Fully provisioned profile for a server carrying the `pgx_md5`, `pgx_pw`
    /// and `pgx_none` roles and accepting TLS on the loopback interface.
    #[must_use]
    pub fn reference() -> Self {
        let active = ScenarioEntry::Active;
        Self::disabled()
            .with_entry(ScenarioId::Default, active(md5_config(DEFAULT_SOCKET_DIR)))
            .with_entry(ScenarioId::Tcp, active(md5_config(LOOPBACK)))
            .with_entry(
                ScenarioId::UnixSocket,
                active(ConnectionScenarioConfig::new(
                    DEFAULT_SOCKET_DIR,
                    TRUST_USER,
                    TEST_DATABASE,
                )),
            )
            .with_entry(ScenarioId::Md5Auth, active(md5_config(LOOPBACK)))
            .with_entry(
                ScenarioId::PlainPassword,
                active(
                    ConnectionScenarioConfig::new(LOOPBACK, PASSWORD_USER, TEST_DATABASE)
                        .with_password(TEST_PASSWORD),
                ),
            )
            .with_entry(
                ScenarioId::NoPassword,
                active(ConnectionScenarioConfig::new(
                    LOOPBACK,
                    TRUST_USER,
                    TEST_DATABASE,
                )),
            )
            .with_entry(
                ScenarioId::InvalidUser,
                active(ConnectionScenarioConfig::new(
                    LOOPBACK,
                    UNKNOWN_USER,
                    TEST_DATABASE,
                )),
            )
            .with_entry(
                ScenarioId::Tls,
                active(md5_config(LOOPBACK).with_tls(TlsPolicy::skip_verification())),
            )
            .with_entry(ScenarioId::CustomDialer, active(md5_config(LOOPBACK)))
    }

    /// Replace the slot for `id`.
    #[must_use]
    pub fn with_entry(mut self, id: ScenarioId, entry: ScenarioEntry) -> Self {
        self.entries[id.index()] = entry;
        self
    }

    /// Entry for a scenario.
    #[must_use]
    pub const fn get(&self, id: ScenarioId) -> &ScenarioEntry {
        &self.entries[id.index()]
    }

    /// Entry for a scenario given by name.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ScenarioError::UnknownScenario`] when `name` is not a
    /// known scenario.
    pub fn lookup(&self, name: &str) -> ScenarioResult<&ScenarioEntry> {
        Ok(self.get(name.parse()?))
    }

    /// Entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (ScenarioId, &ScenarioEntry)> + '_ {
        ScenarioId::ALL.into_iter().zip(self.entries.iter())
    }

    /// Active scenarios in declaration order.
    pub fn active(&self) -> impl Iterator<Item = (ScenarioId, &ConnectionScenarioConfig)> + '_ {
        self.iter()
            .filter_map(|(id, entry)| entry.config().map(|config| (id, config)))
    }

    /// Check every active scenario for blank required fields.
    ///
    /// # Errors
    ///
    /// Returns the first [`crate::ScenarioError::EmptyField`] encountered.
    pub fn validate(&self) -> ScenarioResult<()> {
        self.active()
            .try_for_each(|(id, config)| config.validate(id))
    }
}

impl Default for ScenarioRegistry {
    fn default() -> Self {
        Self::baseline()
    }
}

fn md5_config(host: &str) -> ConnectionScenarioConfig {
    ConnectionScenarioConfig::new(host, MD5_USER, TEST_DATABASE).with_password(TEST_PASSWORD)
}
