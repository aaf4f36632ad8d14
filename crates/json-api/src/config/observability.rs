//! Observability & Logging Config

use clap::Args;

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Deployment environment the server runs in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum AppEnvironment {
    /// Internal error details are returned to callers.
    Development,

    /// Internal error details are replaced with a generic message.
    Production,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Request diagnostics settings.
#[derive(Debug, Args)]
pub struct ObservabilityConfig {
    /// Deployment environment (development, production)
    #[arg(long, env = "APP_ENV", value_enum, default_value_t = AppEnvironment::Production)]
    pub app_env: AppEnvironment,

    /// Threshold for slow request warnings.
    #[arg(long, env = "SLOW_REQUEST_THRESHOLD_MS", default_value_t = 1_000_u64)]
    pub slow_request_threshold_ms: u64,
}
