//! Logging setup for the csv-eda binary.
//!
//! Diagnostics go to stderr so that `overview` output on stdout stays clean
//! enough to pipe. The verbosity flag picks the default level and `RUST_LOG`
//! overrides it.
//!
//! ```no_run
//! csv_eda::logging::init(1).expect("Failed to initialize logging");
//! tracing::info!("App started");
//! ```

use anyhow::{Context as _, Result};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _};

/// Maps the number of `-v` flags to a default filter directive.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Initializes the global subscriber.
///
/// # Errors
///
/// Returns error if the filter cannot be built or a subscriber is already set.
pub fn init(verbosity: u8) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(verbosity)))
        .context("Failed to create env filter")?;

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_line_number(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::debug!("Logging initialized at {}", default_directive(verbosity));

    Ok(())
}
