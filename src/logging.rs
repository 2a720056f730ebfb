//! Structured logging setup.
//!
//! Warnings (collisions, dirty trees, ignored arguments) and phase progress
//! go to the host build log via `tracing`; JSON output is available for
//! builds that collect structured logs.

use std::env;

use anyhow::Result;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON structured logging for machine-read build logs.
    Json,
    /// Human-readable output for interactive builds.
    Pretty,
}

impl LogFormat {
    pub fn from_env() -> Self {
        match env::var("BUILDMETA_LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Initialize the global subscriber. Logs go to stderr so generated file
/// content on stdout (if any) stays clean.
pub fn init_logging(format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .try_init()?;
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(false),
                )
                .try_init()?;
        }
    }
    Ok(())
}
