use std::env;
use thiserror::Error;

/// URL for accessing the PostgreSQL database (should contain a database name in the path)
pub const DB_URL: &str = "DATABASE_URL";
/// Address the HTTP server binds to, such as "0.0.0.0:8080"
pub const LISTEN_ADDRESS: &str = "LISTEN_ADDRESS";
/// Log level configuration for the application. For formatting info, see [EnvFilter's documentation](https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html)
pub const LOG_LEVEL: &str = "LOG_LEVEL";

/// OpenTelemetry span export URL. Should be http://localhost:4317 by default, as the service should
/// have an OpenTelemetry collector sidecar which directs metrics to the correct place
pub const OTEL_SPAN_EXPORT_URL: &str = "OTEL_SPAN_EXPORT_URL";
/// OpenTelemetry metrics export URL. Should be http://localhost:4317 by default, as the service should
/// have an OpenTelemetry collector sidecar which directs metrics to the correct place
pub const OTEL_METRIC_EXPORT_URL: &str = "OTEL_METRIC_EXPORT_URL";

const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0:8080";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("the {0} environment variable must be set")]
    Missing(&'static str),
    #[error("the {0} environment variable must not be empty")]
    Empty(&'static str),
}

/// Endpoints which OpenTelemetry data gets exported to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtelEndpoints {
    pub spans: String,
    pub metrics: String,
}

/// Process-wide configuration, read once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_url: String,
    pub listen_address: String,
    /// Only present when both export URLs are configured
    pub otel: Option<OtelEndpoints>,
}

impl AppConfig {
    /// Reads configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup so the parsing rules can be tested
    /// without touching the process environment
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let db_url = lookup(DB_URL).ok_or(ConfigError::Missing(DB_URL))?;
        if db_url.trim().is_empty() {
            return Err(ConfigError::Empty(DB_URL));
        }

        let listen_address = lookup(LISTEN_ADDRESS)
            .filter(|address| !address.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDRESS.to_owned());

        let otel = match (lookup(OTEL_SPAN_EXPORT_URL), lookup(OTEL_METRIC_EXPORT_URL)) {
            (Some(spans), Some(metrics)) if !spans.is_empty() && !metrics.is_empty() => {
                Some(OtelEndpoints { spans, metrics })
            }
            _ => None,
        };

        Ok(AppConfig {
            db_url,
            listen_address,
            otel,
        })
    }
}
