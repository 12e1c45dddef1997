//! Contract between the scenario harness and the driver under test.

use std::io;
use std::time::Duration;

use async_trait::async_trait;
use pgx_scenarios::ConnectionScenarioConfig;
use thiserror::Error;

/// Failures reported by a [`Connector`].
#[derive(Debug, Error)]
pub enum ConnectError {
    /// The server refused the supplied credentials.
    #[error("server rejected authentication: {message}")]
    Authentication {
        /// SQLSTATE reported by the server, when available.
        code: Option<String>,
        /// Server message.
        message: String,
    },
    /// TLS could not be negotiated.
    #[error("tls negotiation failed: {message}")]
    Tls {
        /// Failure detail.
        message: String,
    },
    /// The transport failed before a session was established.
    #[error("transport error")]
    Io {
        /// Underlying IO error.
        source: io::Error,
    },
    /// The attempt exceeded the configured connect timeout.
    #[error("connection attempt timed out after {timeout:?}")]
    Timeout {
        /// Timeout that elapsed.
        timeout: Duration,
    },
    /// Any other driver failure.
    #[error("connection failed: {message}")]
    Other {
        /// Failure detail.
        message: String,
    },
}

impl ConnectError {
    /// Whether the server rejected the credentials.
    #[must_use]
    pub const fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }
}

/// Opens sessions for scenario configurations.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Live session returned on success.
    type Session: Send;

    /// Establish a session using `config`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConnectError`] when no session could be established.
    async fn connect(
        &self,
        config: &ConnectionScenarioConfig,
    ) -> Result<Self::Session, ConnectError>;

    /// Release a session obtained from [`Connector::connect`].
    ///
    /// # Errors
    ///
    /// Returns a [`ConnectError`] when the session could not be shut down cleanly.
    async fn close(&self, session: Self::Session) -> Result<(), ConnectError> {
        drop(session);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn connect_error_display_and_source() {
        let auth = ConnectError::Authentication {
            code: Some("28P01".to_string()),
            message: "password authentication failed for user \"invalid\"".to_string(),
        };
        assert!(auth.is_authentication());
        assert_eq!(
            auth.to_string(),
            "server rejected authentication: password authentication failed for user \"invalid\""
        );
        assert!(auth.source().is_none());

        let io = ConnectError::Io {
            source: io::Error::from(io::ErrorKind::ConnectionRefused),
        };
        assert!(!io.is_authentication());
        assert_eq!(io.to_string(), "transport error");
        assert!(io.source().is_some());

        let timeout = ConnectError::Timeout {
            timeout: Duration::from_secs(5),
        };
        assert_eq!(timeout.to_string(), "connection attempt timed out after 5s");
    }
}
