//! Log output for batch runs.

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

use crate::config::TelemetryConfig;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("log level '{directive}' is not a valid filter for the sync run")]
    LogLevel {
        directive: String,
        #[source]
        source: ParseError,
    },
    #[error("sync logging could not be started: {0}")]
    AlreadyInstalled(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Picks the directive for the run: `RUST_LOG` when set, otherwise `APP_LOG_LEVEL`.
pub fn build_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.log_level).map_err(|source| TelemetryError::LogLevel {
        directive: config.log_level.clone(),
        source,
    })
}

/// Starts logging to stderr, leaving stdout free for the run summary.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = build_filter(config)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(false)
        .compact()
        .try_init()
        .map_err(TelemetryError::AlreadyInstalled)?;

    tracing::debug!(level = %config.log_level, "sync logging started");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparsable_level_names_the_directive() {
        std::env::remove_var("RUST_LOG");
        let config = TelemetryConfig {
            log_level: "agency_sync=notalevel".to_string(),
        };
        let error = build_filter(&config).expect_err("filter rejected");
        assert_eq!(
            error.to_string(),
            "log level 'agency_sync=notalevel' is not a valid filter for the sync run"
        );
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn configured_level_builds_a_filter() {
        std::env::remove_var("RUST_LOG");
        let config = TelemetryConfig {
            log_level: "agency_sync=debug,info".to_string(),
        };
        assert!(build_filter(&config).is_ok());
    }
}
