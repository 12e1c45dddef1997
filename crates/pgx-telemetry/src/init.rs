//! Logging initialisation for the scenario suites.
//!
//! # Design
//! - `RUST_LOG` wins over the configured level when it is set.
//! - Suites pick format and level through `PGX_TEST_LOG_FORMAT` / `PGX_TEST_LOG_LEVEL`.
//! - One subscriber per process; output goes through the libtest capture.

use anyhow::{Result, anyhow};
use once_cell::sync::OnceCell;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Level used when neither `RUST_LOG` nor [`LOG_LEVEL_VAR`] is set.
pub const DEFAULT_LOG_LEVEL: &str = "debug";
/// Selects the output format (`pretty` or `json`).
pub const LOG_FORMAT_VAR: &str = "PGX_TEST_LOG_FORMAT";
/// Overrides [`DEFAULT_LOG_LEVEL`].
pub const LOG_LEVEL_VAR: &str = "PGX_TEST_LOG_LEVEL";

static TEST_LOGGING: OnceCell<()> = OnceCell::new();

/// Available output formats for the logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Emit logs as structured JSON objects, one per line.
    Json,
    /// Emit human-readable logs.
    #[default]
    Pretty,
}

impl LogFormat {
    /// Parse a format name, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "pretty" => Some(Self::Pretty),
            _ => None,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset (e.g., `info`, `debug`).
    pub level: String,
    /// Output format selection for the tracing subscriber.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            format: LogFormat::default(),
        }
    }
}

impl LoggingConfig {
    /// Configuration read from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Configuration read through `lookup`; blank or unknown values keep the defaults.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let level = lookup(LOG_LEVEL_VAR)
            .map(|level| level.trim().to_string())
            .filter(|level| !level.is_empty())
            .unwrap_or(defaults.level);
        let format = lookup(LOG_FORMAT_VAR)
            .and_then(|value| LogFormat::parse(&value))
            .unwrap_or(defaults.format);
        Self { level, format }
    }
}

/// Install the global tracing subscriber, writing through the test capture.
///
/// # Errors
///
/// Returns an error if the tracing subscriber cannot be installed (for example,
/// because another subscriber has already been set globally).
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = build_env_filter(&config.level);
    let installed = match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(false)
                    .with_test_writer(),
            )
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_test_writer())
            .try_init(),
    };
    installed.map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))
}

/// Install the environment-configured subscriber once per process.
///
/// Later calls, or a subscriber installed elsewhere, are ignored.
pub fn init_test_logging() {
    TEST_LOGGING.get_or_init(|| {
        if let Err(err) = init_logging(&LoggingConfig::from_env()) {
            eprintln!("{err}");
        }
    });
}

fn build_env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}
