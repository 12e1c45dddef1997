//! Scripted connector for exercising the harness without a server.

use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use pgx_scenarios::ConnectionScenarioConfig;
use tokio::sync::Mutex;

use crate::connector::{ConnectError, Connector};

/// Scripted reaction to a connection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubResponse {
    /// Hand out a session.
    Accept,
    /// Fail with [`ConnectError::Authentication`].
    RejectAuthentication,
    /// Fail with a refused connection.
    Refuse,
}

/// Session handed out by [`StubConnector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubSession {
    /// Role the session was opened for.
    pub user: String,
}

/// Connector whose responses are scripted per role.
#[derive(Debug)]
pub struct StubConnector {
    fallback: StubResponse,
    by_user: HashMap<String, StubResponse>,
    fail_close: bool,
    attempts: Mutex<Vec<String>>,
    closed: AtomicUsize,
}

impl StubConnector {
    /// Connector answering every attempt with `fallback`.
    #[must_use]
    pub fn new(fallback: StubResponse) -> Self {
        Self {
            fallback,
            by_user: HashMap::new(),
            fail_close: false,
            attempts: Mutex::new(Vec::new()),
            closed: AtomicUsize::new(0),
        }
    }

    /// Answer attempts for `user` with `response`.
    #[must_use]
    pub fn respond(mut self, user: impl Into<String>, response: StubResponse) -> Self {
        self.by_user.insert(user.into(), response);
        self
    }

    /// Make every close call fail.
    #[must_use]
    pub const fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    /// Hosts of every connection attempt, in order.
    pub async fn attempts(&self) -> Vec<String> {
        self.attempts.lock().await.clone()
    }

    /// Number of sessions handed back through `close`.
    #[must_use]
    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for StubConnector {
    type Session = StubSession;

    async fn connect(
        &self,
        config: &ConnectionScenarioConfig,
    ) -> Result<StubSession, ConnectError> {
        self.attempts.lock().await.push(config.host.clone());
        let response = self
            .by_user
            .get(&config.user)
            .copied()
            .unwrap_or(self.fallback);
        match response {
            StubResponse::Accept => Ok(StubSession {
                user: config.user.clone(),
            }),
            StubResponse::RejectAuthentication => Err(ConnectError::Authentication {
                code: Some("28P01".to_string()),
                message: format!(
                    "password authentication failed for user \"{}\"",
                    config.user
                ),
            }),
            StubResponse::Refuse => Err(ConnectError::Io {
                source: io::Error::from(io::ErrorKind::ConnectionRefused),
            }),
        }
    }

    async fn close(&self, _session: StubSession) -> Result<(), ConnectError> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            return Err(ConnectError::Other {
                message: "terminate message not acknowledged".to_string(),
            });
        }
        Ok(())
    }
}
