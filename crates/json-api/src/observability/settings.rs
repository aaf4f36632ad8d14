//! Process-global observability runtime settings.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::config::{ServerConfig, observability::AppEnvironment};

const DEFAULT_SLOW_REQUEST_THRESHOLD_MS: u64 = 1_000;

static SLOW_REQUEST_THRESHOLD_MS: AtomicU64 = AtomicU64::new(DEFAULT_SLOW_REQUEST_THRESHOLD_MS);
static EXPOSE_INTERNAL_ERRORS: AtomicBool = AtomicBool::new(false);

pub(super) fn apply_runtime_config(config: &ServerConfig) {
    SLOW_REQUEST_THRESHOLD_MS.store(
        config.observability.slow_request_threshold_ms,
        Ordering::Relaxed,
    );
    EXPOSE_INTERNAL_ERRORS.store(
        config.observability.app_env == AppEnvironment::Development,
        Ordering::Relaxed,
    );
}

pub(super) fn slow_request_threshold_ms() -> u64 {
    SLOW_REQUEST_THRESHOLD_MS.load(Ordering::Relaxed)
}

/// Whether 5xx responses may carry the underlying error message.
pub(crate) fn expose_internal_errors() -> bool {
    EXPOSE_INTERNAL_ERRORS.load(Ordering::Relaxed)
}
