//! Scenario identifiers and the connection settings attached to them.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ScenarioError, ScenarioResult};

/// Named connection path exercised by the integration suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioId {
    /// Connection used by the bulk of the suite.
    Default,
    /// Plain TCP connection.
    Tcp,
    /// Unix-domain socket connection.
    UnixSocket,
    /// MD5 password authentication.
    Md5Auth,
    /// Cleartext password authentication.
    PlainPassword,
    /// Trust authentication without a password.
    NoPassword,
    /// Role unknown to the server; authentication must be rejected.
    InvalidUser,
    /// TLS-encrypted connection.
    Tls,
    /// Connection established through a caller-supplied dialer.
    CustomDialer,
}

impl ScenarioId {
    /// Every scenario in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Default,
        Self::Tcp,
        Self::UnixSocket,
        Self::Md5Auth,
        Self::PlainPassword,
        Self::NoPassword,
        Self::InvalidUser,
        Self::Tls,
        Self::CustomDialer,
    ];

    /// Kebab-case name used in reports and overlay files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Tcp => "tcp",
            Self::UnixSocket => "unix-socket",
            Self::Md5Auth => "md5-auth",
            Self::PlainPassword => "plain-password",
            Self::NoPassword => "no-password",
            Self::InvalidUser => "invalid-user",
            Self::Tls => "tls",
            Self::CustomDialer => "custom-dialer",
        }
    }

    /// Upper-snake suffix used for environment overrides (`UNIX_SOCKET`).
    #[must_use]
    pub const fn env_suffix(self) -> &'static str {
        match self {
            Self::Default => "DEFAULT",
            Self::Tcp => "TCP",
            Self::UnixSocket => "UNIX_SOCKET",
            Self::Md5Auth => "MD5_AUTH",
            Self::PlainPassword => "PLAIN_PASSWORD",
            Self::NoPassword => "NO_PASSWORD",
            Self::InvalidUser => "INVALID_USER",
            Self::Tls => "TLS",
            Self::CustomDialer => "CUSTOM_DIALER",
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl Display for ScenarioId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for ScenarioId {
    type Err = ScenarioError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == value)
            .ok_or_else(|| ScenarioError::UnknownScenario {
                name: value.to_string(),
            })
    }
}

/// How the server certificate is checked once TLS is negotiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificateVerification {
    /// Verify the chain and the host name.
    Full,
    /// Encrypt the session but accept any certificate.
    Skip,
}

/// TLS requirements for a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TlsPolicy {
    /// Certificate verification behaviour.
    pub verification: CertificateVerification,
}

impl TlsPolicy {
    /// TLS that trusts any server certificate.
    #[must_use]
    pub const fn skip_verification() -> Self {
        Self {
            verification: CertificateVerification::Skip,
        }
    }

    /// TLS with full certificate and host name verification.
    #[must_use]
    pub const fn verify_full() -> Self {
        Self {
            verification: CertificateVerification::Full,
        }
    }
}

/// Transport implied by a scenario host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// Network connection to a host name or address.
    Tcp,
    /// Unix-domain socket inside the host directory.
    UnixSocket,
}

/// Settings for one way of connecting to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionScenarioConfig {
    /// Network address, or socket directory when it starts with `/`.
    pub host: String,
    /// Port override; 5432 applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Role used to authenticate.
    pub user: String,
    /// Credential; `None` means no password is sent.
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    /// Target database.
    pub database: String,
    /// TLS policy; `None` disables TLS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<TlsPolicy>,
}

impl ConnectionScenarioConfig {
    /// Build a config without password, port override or TLS.
    #[must_use]
    pub fn new(
        host: impl Into<String>,
        user: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: None,
            user: user.into(),
            password: None,
            database: database.into(),
            tls: None,
        }
    }

    /// Attach a password.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Attach a port override.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Attach a TLS policy.
    #[must_use]
    pub const fn with_tls(mut self, tls: TlsPolicy) -> Self {
        self.tls = Some(tls);
        self
    }

    /// Transport selected by the host value.
    #[must_use]
    pub fn transport(&self) -> Transport {
        if self.host.starts_with('/') {
            Transport::UnixSocket
        } else {
            Transport::Tcp
        }
    }

    /// Ensure required values are present.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::EmptyField`] when host, user or database is blank.
    pub fn validate(&self, scenario: ScenarioId) -> ScenarioResult<()> {
        let required = [
            ("host", &self.host),
            ("user", &self.user),
            ("database", &self.database),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ScenarioError::EmptyField {
                    scenario: scenario.to_string(),
                    field,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_names_round_trip() {
        for id in ScenarioId::ALL {
            assert_eq!(id.as_str().parse::<ScenarioId>().ok(), Some(id));
            assert_eq!(id.to_string(), id.as_str());
        }
        assert!(matches!(
            "ipv6".parse::<ScenarioId>(),
            Err(ScenarioError::UnknownScenario { name }) if name == "ipv6"
        ));
    }

    #[test]
    fn declaration_order_matches_index() {
        for (position, id) in ScenarioId::ALL.into_iter().enumerate() {
            assert_eq!(id.index(), position);
        }
    }

    #[test]
    fn serde_names_match_display() -> Result<(), serde_json::Error> {
        let encoded = serde_json::to_string(&ScenarioId::Md5Auth)?;
        assert_eq!(encoded, "\"md5-auth\"");
        let decoded: ScenarioId = serde_json::from_str("\"custom-dialer\"")?;
        assert_eq!(decoded, ScenarioId::CustomDialer);
        Ok(())
    }

    #[test]
    fn transport_follows_host_shape() {
        let socket = ConnectionScenarioConfig::new("/private/tmp", "pgx_none", "pgx_test");
        assert_eq!(socket.transport(), Transport::UnixSocket);
        let tcp = ConnectionScenarioConfig::new("127.0.0.1", "pgx_md5", "pgx_test");
        assert_eq!(tcp.transport(), Transport::Tcp);
    }

    #[test]
    fn validate_rejects_blank_fields() {
        let config = ConnectionScenarioConfig::new("127.0.0.1", " ", "pgx_test");
        assert!(matches!(
            config.validate(ScenarioId::Tcp),
            Err(ScenarioError::EmptyField { field: "user", .. })
        ));
        let config = ConnectionScenarioConfig::new("127.0.0.1", "pgx_md5", "pgx_test");
        assert!(config.validate(ScenarioId::Tcp).is_ok());
    }

    #[test]
    fn password_is_never_serialized() -> Result<(), serde_json::Error> {
        let config = ConnectionScenarioConfig::new("127.0.0.1", "pgx_md5", "pgx_test")
            .with_password("secret")
            .with_tls(TlsPolicy::skip_verification());
        let value = serde_json::to_value(&config)?;
        assert!(value.get("password").is_none());
        assert_eq!(value["tls"]["verification"], "skip");
        Ok(())
    }
}
