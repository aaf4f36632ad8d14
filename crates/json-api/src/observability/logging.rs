//! Logging subscriber initialisation.

use tracing_subscriber::{
    EnvFilter, Registry,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{ServerConfig, observability::LogFormat};

use super::ObservabilityError;

pub(super) fn init_subscriber(config: &ServerConfig) -> Result<(), ObservabilityError> {
    match config.logging.log_format {
        LogFormat::Compact => init_with_layer(
            config,
            tracing_subscriber::fmt::layer()
                .compact()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        ),
        LogFormat::Json => init_with_layer(
            config,
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_target(true),
        ),
    }
}

fn build_env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{log_level},h2=warn,hyper=warn,sqlx=warn,reqwest=warn"
        ))
    })
}

fn init_with_layer<L>(config: &ServerConfig, fmt_layer: L) -> Result<(), ObservabilityError>
where
    L: Layer<Registry> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(build_env_filter(&config.logging.log_level))
        .try_init()?;

    Ok(())
}
