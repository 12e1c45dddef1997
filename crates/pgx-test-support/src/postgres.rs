//! Connector backed by `sqlx` for running scenarios against a real Postgres server.

use std::time::Duration;

use async_trait::async_trait;
use pgx_scenarios::{CertificateVerification, ConnectionScenarioConfig, TlsPolicy, Transport};
use sqlx::Connection;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgSslMode};
use tokio::time::timeout;

use crate::connector::{ConnectError, Connector};

/// SQLSTATE class for `invalid_authorization_specification` and friends.
const AUTH_SQLSTATE_CLASS: &str = "28";

/// Opens one `PgConnection` per scenario.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlxConnector {
    connect_timeout: Option<Duration>,
}

impl SqlxConnector {
    /// Connector without a connect timeout.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            connect_timeout: None,
        }
    }

    /// Abort attempts that take longer than `limit`.
    #[must_use]
    pub const fn with_connect_timeout(mut self, limit: Duration) -> Self {
        self.connect_timeout = Some(limit);
        self
    }
}

#[async_trait]
impl Connector for SqlxConnector {
    type Session = PgConnection;

    async fn connect(
        &self,
        config: &ConnectionScenarioConfig,
    ) -> Result<PgConnection, ConnectError> {
        let options = connect_options(config);
        let attempt = PgConnection::connect_with(&options);
        let result = match self.connect_timeout {
            Some(limit) => timeout(limit, attempt)
                .await
                .map_err(|_| ConnectError::Timeout { timeout: limit })?,
            None => attempt.await,
        };
        result.map_err(classify)
    }

    async fn close(&self, session: PgConnection) -> Result<(), ConnectError> {
        session.close().await.map_err(classify)
    }
}

/// Port used when a scenario leaves it unset.
pub const DEFAULT_PORT: u16 = 5432;

/// Translate a scenario into `sqlx` connect options.
///
/// Hosts starting with `/` are treated as socket directories. `sqlx` seeds its
/// options from the `PG*` environment variables, so every field a scenario
/// controls is set explicitly. A scenario without a password gets the empty
/// password, which is exactly what `sqlx` answers an authentication request
/// with when none is configured.
#[must_use]
pub fn connect_options(config: &ConnectionScenarioConfig) -> PgConnectOptions {
    let options = PgConnectOptions::new_without_pgpass()
        .username(&config.user)
        .password(config.password.as_deref().unwrap_or_default())
        .database(&config.database)
        .port(config.port.unwrap_or(DEFAULT_PORT))
        .ssl_mode(ssl_mode(config.tls));
    match config.transport() {
        Transport::UnixSocket => options.socket(&config.host),
        Transport::Tcp => options.host(&config.host),
    }
}

const fn ssl_mode(tls: Option<TlsPolicy>) -> PgSslMode {
    match tls {
        None => PgSslMode::Disable,
        Some(TlsPolicy {
            verification: CertificateVerification::Skip,
        }) => PgSslMode::Require,
        Some(TlsPolicy {
            verification: CertificateVerification::Full,
        }) => PgSslMode::VerifyFull,
    }
}

/// Map a `sqlx` failure onto the harness error taxonomy.
#[must_use]
pub fn classify(err: sqlx::Error) -> ConnectError {
    match err {
        sqlx::Error::Database(db) => {
            let code = db.code().map(std::borrow::Cow::into_owned);
            let message = db.message().to_string();
            if code
                .as_deref()
                .is_some_and(|code| code.starts_with(AUTH_SQLSTATE_CLASS))
            {
                ConnectError::Authentication { code, message }
            } else {
                let sqlstate = code.as_deref().unwrap_or("no sqlstate");
                ConnectError::Other {
                    message: format!("{message} ({sqlstate})"),
                }
            }
        }
        sqlx::Error::Io(source) => ConnectError::Io { source },
        sqlx::Error::Tls(source) => ConnectError::Tls {
            message: source.to_string(),
        },
        other => ConnectError::Other {
            message: other.to_string(),
        },
    }
}
