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

//! Connection scenarios for the driver integration suite.
//!
//! Layout: `model.rs` (scenario identifiers and connection configs),
//! `registry.rs` (the immutable scenario table and built-in profiles),
//! `loader.rs` (environment and file overlays), `error.rs`.

pub mod error;
pub mod loader;
pub mod model;
pub mod registry;

pub use error::{ScenarioError, ScenarioResult};
pub use loader::{Profile, ScenarioLoader};
pub use model::{
    CertificateVerification, ConnectionScenarioConfig, ScenarioId, TlsPolicy, Transport,
};
pub use registry::{ScenarioEntry, ScenarioRegistry};
