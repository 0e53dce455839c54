use anyhow::anyhow;
use tracing_subscriber::EnvFilter;

use super::config::TelemetryConfig;

/// Console logging, filtered by `RUST_LOG` or else the configured level.
pub fn initialize_telemetry(config: &TelemetryConfig) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)?,
    };
    let debug = config.enable_debug_logging;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(debug)
        .with_line_number(debug)
        .with_thread_ids(debug)
        .with_target(debug)
        .try_init()
        .map_err(|e| anyhow!("{e}"))
}
