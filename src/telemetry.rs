//! Tracing subscriber setup.

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs the global subscriber.
///
/// `log_level` is an `EnvFilter` directive string such as `info` or
/// `linkforge=debug,sqlx=warn`. `log_format` is `text` or `json`.
///
/// # Errors
///
/// Returns an error if the filter cannot be parsed or a subscriber is
/// already installed.
pub fn init_tracing(log_level: &str, log_format: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level)
        .with_context(|| format!("Invalid log filter '{log_level}'"))?
        .add_directive("hyper=warn".parse()?)
        .add_directive("sqlx::query=warn".parse()?);

    let registry = tracing_subscriber::registry().with(filter);

    let installed = if log_format == "json" {
        registry
            .with(fmt::layer().json().with_current_span(true))
            .try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };

    installed.context("Failed to install tracing subscriber")
}
