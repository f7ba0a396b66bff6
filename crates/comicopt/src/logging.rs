//! Logging initialization and configuration.
//!
//! Uses the `tracing` ecosystem with human-readable or JSON output. Logs go to
//! stderr so optimizer reports on stdout stay pipeable.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the logging subsystem.
///
/// `RUST_LOG` overrides `default_level` when set.
pub fn init(default_level: &str, json_format: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Pick the level from the config file, with `-v` forcing at least debug.
pub fn level_for(config: &comicopt_core::Config, verbose: bool) -> String {
    let configured = config.logging.level.to_lowercase();
    if verbose && configured != "trace" {
        "debug".to_string()
    } else {
        configured
    }
}

/// Initialize logging with settings from the loaded configuration.
pub fn init_from_config(
    config: &comicopt_core::Config,
    verbose_override: bool,
    json_logs_override: bool,
) {
    let json_format = json_logs_override || config.logging.format == "json";
    init(&level_for(config, verbose_override), json_format);
}
