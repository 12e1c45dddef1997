#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Harness that drives connection scenarios through a driver connector.
//! Layout: connector.rs (connector contract + errors), postgres.rs (sqlx-backed connector),
//! harness.rs (scenario runner and summaries), fixtures.rs (env/helpers), mocks.rs (scripted connector).

pub mod connector;
pub mod fixtures;
pub mod harness;
pub mod mocks;
pub mod postgres;

pub use connector::{ConnectError, Connector};
pub use harness::{
    Expectation, RunSummary, ScenarioOutcome, ScenarioReport, run_scenario, run_scenarios,
};
pub use postgres::SqlxConnector;
