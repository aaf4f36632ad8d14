//! Observability setup and request tracing middleware.

use thiserror::Error;

use crate::config::ServerConfig;

mod error_log;
mod logging;
mod metrics;
mod request;
mod settings;

pub(crate) use error_log::error_logging;
pub(crate) use metrics::{ParticipationEvent, metrics_handler, observe_participation};
pub(crate) use request::{REQUEST_ID_DEPOT_KEY, request_logging};
pub(crate) use settings::expose_internal_errors;

/// Errors raised while initialising observability.
#[derive(Debug, Error)]
pub(crate) enum ObservabilityError {
    /// Failed to initialise tracing subscriber.
    #[error("failed to initialise tracing subscriber: {0}")]
    TracingSubscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Apply runtime settings and install the global tracing subscriber.
pub(crate) fn init(config: &ServerConfig) -> Result<(), ObservabilityError> {
    settings::apply_runtime_config(config);

    logging::init_subscriber(config)
}
