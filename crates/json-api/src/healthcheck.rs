//! Liveness probe.

use jiff::Timestamp;
use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

/// Healthcheck response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct HealthResponse {
    /// Always `ok` while the process is serving
    pub status: String,

    /// Server clock at the time of the check
    pub timestamp: String,
}

/// Healthcheck handler
///
/// Reports that the process is up. Does not touch the database.
#[endpoint(tags("health"), summary = "Health check endpoint")]
pub(crate) async fn handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Timestamp::now().to_string(),
    })
}
