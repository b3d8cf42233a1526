use crate::config::{AppEnvironment, TelemetryConfig};
use std::fmt;
use tracing::Subscriber;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub enum TelemetryError {
    EnvFilter { value: String, source: ParseError },
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::EnvFilter { value, .. } => {
                write!(
                    f,
                    "invalid log level/filter '{}': unable to build EnvFilter",
                    value
                )
            }
            TelemetryError::Subscriber(err) => write!(f, "telemetry error: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::EnvFilter { source, .. } => Some(source),
            TelemetryError::Subscriber(err) => Some(&**err),
        }
    }
}

/// `RUST_LOG` wins over the configured level when it parses.
pub fn build_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(&config.log_level).map_err(|source| TelemetryError::EnvFilter {
        value: config.log_level.clone(),
        source,
    })
}

/// Compact fmt subscriber writing to `writer`.
pub fn subscriber<W>(
    config: &TelemetryConfig,
    environment: AppEnvironment,
    writer: W,
) -> Result<impl Subscriber + Send + Sync + 'static, TelemetryError>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let env_filter = build_filter(config)?;

    Ok(tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(environment == AppEnvironment::Development)
        .compact()
        .with_ansi(false)
        .with_writer(writer)
        .finish())
}

/// Installs the global subscriber on stdout for the HTTP service.
pub fn init(config: &TelemetryConfig, environment: AppEnvironment) -> Result<(), TelemetryError> {
    install(subscriber(config, environment, std::io::stdout)?)
}

/// Installs the global subscriber on stderr so command output on stdout stays clean.
pub fn init_stderr(
    config: &TelemetryConfig,
    environment: AppEnvironment,
) -> Result<(), TelemetryError> {
    install(subscriber(config, environment, std::io::stderr)?)
}

fn install<S>(subscriber: S) -> Result<(), TelemetryError>
where
    S: Subscriber + Send + Sync + 'static,
{
    subscriber
        .try_init()
        .map_err(|err| TelemetryError::Subscriber(Box::new(err)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_level_builds_filter() {
        let config = TelemetryConfig {
            log_level: "co2e_portal=debug,info".to_string(),
        };
        assert!(build_filter(&config).is_ok());
    }

    #[test]
    fn invalid_level_is_reported() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = TelemetryConfig {
            log_level: "co2e_portal=loud".to_string(),
        };
        assert!(matches!(
            subscriber(&config, AppEnvironment::Test, std::io::sink),
            Err(TelemetryError::EnvFilter { .. })
        ));
    }
}
