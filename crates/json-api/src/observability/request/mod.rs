//! Request-level logging and request IDs.

mod request_ids;
mod spans;

use std::time::Instant;

use salvo::{
    Request, handler,
    prelude::{Depot, FlowCtrl, Response},
};
use tracing::Instrument as _;
use tracing::{error, info, warn};

use super::{metrics, settings};

use spans::normalise_path;

/// Depot key holding the request id as a `String`.
pub(crate) const REQUEST_ID_DEPOT_KEY: &str = "request_id";

#[handler]
pub(crate) async fn request_logging(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    if req.uri().path() == "/metrics" {
        ctrl.call_next(req, depot, res).await;
        return;
    }

    let started = Instant::now();

    let request_id =
        request_ids::resolve_request_id(req.header::<String>(request_ids::REQUEST_ID_HEADER));

    depot.insert(REQUEST_ID_DEPOT_KEY, request_id.clone());

    request_ids::set_request_id_header(res, &request_id);

    let method = req.method().to_string();
    let path = req.uri().path().to_owned();
    let remote_addr = req.remote_addr().to_string();
    let route = normalise_path(&path);
    let _in_flight_request = metrics::InFlightRequestGuard::track();

    let span = tracing::info_span!(
        parent: None,
        "http.request",
        request_id = %request_id,
        method = %method,
        path = %path,
        route = %route,
        remote_addr = %remote_addr,
        status = tracing::field::Empty,
        duration_ms = tracing::field::Empty
    );

    ctrl.call_next(req, depot, res)
        .instrument(span.clone())
        .await;

    let duration = started.elapsed();
    let status = request_ids::response_status_or_ok(res.status_code);
    let duration_ms = duration.as_millis();
    let threshold_ms = u128::from(settings::slow_request_threshold_ms());

    metrics::observe_request(&method, &route, status.as_u16(), duration.as_secs_f64());

    span.record("status", status.as_u16());
    span.record("duration_ms", duration_ms);

    span.in_scope(|| {
        info!(status = status.as_u16(), duration_ms, "request.completed");

        if status.is_server_error() {
            error!(
                status = status.as_u16(),
                method = %method,
                path = %path,
                request_id = %request_id,
                "server error response"
            );
        } else if status.is_client_error() {
            warn!(
                status = status.as_u16(),
                method = %method,
                path = %path,
                request_id = %request_id,
                "client error response"
            );
        }

        if duration_ms > threshold_ms {
            warn!(
                method = %method,
                path = %path,
                request_id = %request_id,
                duration_ms,
                threshold_ms,
                "slow request detected"
            );
        }
    });
}
