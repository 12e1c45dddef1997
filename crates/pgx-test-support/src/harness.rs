//! Runs registry scenarios through a connector and tallies the outcomes.
//!
//! # Design
//! - Disabled scenarios become `Skipped` and never count toward pass/fail totals.
//! - Sessions are handed back to the connector as soon as the outcome is known.
//! - Scenarios run in registry order, one at a time.

use pgx_scenarios::{ConnectionScenarioConfig, ScenarioEntry, ScenarioId, ScenarioRegistry};
use serde::Serialize;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::connector::Connector;

/// Result a scenario must produce to pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Expectation {
    /// The connector must return a session.
    Session,
    /// The server must refuse the credentials.
    AuthenticationRejected,
}

impl Expectation {
    /// Expectation attached to a scenario.
    #[must_use]
    pub const fn for_scenario(id: ScenarioId) -> Self {
        match id {
            ScenarioId::InvalidUser => Self::AuthenticationRejected,
            _ => Self::Session,
        }
    }
}

/// Outcome of a single scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ScenarioOutcome {
    /// The connector behaved as expected.
    Passed,
    /// The connector did not behave as expected.
    Failed {
        /// Why the scenario failed.
        reason: String,
    },
    /// The scenario is disabled in this environment.
    Skipped,
}

/// Outcome tagged with its scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioReport {
    /// Scenario that ran.
    pub scenario: ScenarioId,
    /// What happened.
    #[serde(flatten)]
    pub outcome: ScenarioOutcome,
}

/// Reports for a full registry run, in registry order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    reports: Vec<ScenarioReport>,
}

impl RunSummary {
    /// All reports.
    #[must_use]
    pub const fn reports(&self) -> &[ScenarioReport] {
        self.reports.as_slice()
    }

    /// Outcome for one scenario.
    #[must_use]
    pub fn outcome(&self, id: ScenarioId) -> Option<&ScenarioOutcome> {
        self.reports
            .iter()
            .find(|report| report.scenario == id)
            .map(|report| &report.outcome)
    }

    /// Number of passed scenarios.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.count(|outcome| matches!(outcome, ScenarioOutcome::Passed))
    }

    /// Number of failed scenarios.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, ScenarioOutcome::Failed { .. }))
    }

    /// Number of skipped scenarios.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, ScenarioOutcome::Skipped))
    }

    /// Scenarios that actually ran (passed plus failed).
    #[must_use]
    pub fn executed(&self) -> usize {
        self.passed() + self.failed()
    }

    /// Whether no executed scenario failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Failed reports.
    pub fn failures(&self) -> impl Iterator<Item = &ScenarioReport> + '_ {
        self.reports
            .iter()
            .filter(|report| matches!(report.outcome, ScenarioOutcome::Failed { .. }))
    }

    fn count(&self, predicate: impl Fn(&ScenarioOutcome) -> bool) -> usize {
        self.reports
            .iter()
            .filter(|report| predicate(&report.outcome))
            .count()
    }
}

/// Run one registry entry.
pub async fn run_scenario<C: Connector>(
    id: ScenarioId,
    entry: &ScenarioEntry,
    connector: &C,
) -> ScenarioOutcome {
    let span = info_span!("scenario", scenario = %id);
    async move {
        match entry {
            ScenarioEntry::Disabled => {
                info!("scenario disabled in this environment; skipping");
                ScenarioOutcome::Skipped
            }
            ScenarioEntry::Active(config) => attempt(id, config, connector).await,
        }
    }
    .instrument(span)
    .await
}

/// Run every scenario in `registry` in declaration order.
pub async fn run_scenarios<C: Connector>(
    registry: &ScenarioRegistry,
    connector: &C,
) -> RunSummary {
    let mut reports = Vec::with_capacity(ScenarioId::ALL.len());
    for (scenario, entry) in registry.iter() {
        let outcome = run_scenario(scenario, entry, connector).await;
        reports.push(ScenarioReport { scenario, outcome });
    }
    let summary = RunSummary { reports };
    info!(
        passed = summary.passed(),
        failed = summary.failed(),
        skipped = summary.skipped(),
        "connection scenarios finished"
    );
    summary
}

async fn attempt<C: Connector>(
    id: ScenarioId,
    config: &ConnectionScenarioConfig,
    connector: &C,
) -> ScenarioOutcome {
    debug!(
        host = %config.host,
        port = ?config.port,
        user = %config.user,
        database = %config.database,
        tls = config.tls.is_some(),
        "connecting"
    );
    let outcome = match (Expectation::for_scenario(id), connector.connect(config).await) {
        (Expectation::Session, Ok(session)) => {
            release(connector, session).await;
            ScenarioOutcome::Passed
        }
        (Expectation::Session, Err(err)) => ScenarioOutcome::Failed {
            reason: err.to_string(),
        },
        (Expectation::AuthenticationRejected, Err(err)) if err.is_authentication() => {
            debug!(error = %err, "authentication rejected as expected");
            ScenarioOutcome::Passed
        }
        (Expectation::AuthenticationRejected, Err(err)) => ScenarioOutcome::Failed {
            reason: format!("expected authentication to be rejected, got: {err}"),
        },
        (Expectation::AuthenticationRejected, Ok(session)) => {
            release(connector, session).await;
            ScenarioOutcome::Failed {
                reason: format!("server accepted role '{}'", config.user),
            }
        }
    };
    if let ScenarioOutcome::Failed { reason } = &outcome {
        warn!(%reason, "scenario failed");
    }
    outcome
}

async fn release<C: Connector>(connector: &C, session: C::Session) {
    if let Err(err) = connector.close(session).await {
        warn!(error = %err, "failed to close session cleanly");
    }
}
