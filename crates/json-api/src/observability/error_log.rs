//! Persistent error log for failed requests.

use std::sync::Arc;

use salvo::{
    http::{ResBody, StatusCode},
    prelude::*,
};
use tracing::{Instrument as _, warn};
use uuid::Uuid;

use rave_app::domain::error_logs::data::NewErrorLog;

use crate::{extensions::*, state::State};

use super::REQUEST_ID_DEPOT_KEY;

/// Record every 4xx/5xx response to the error log without delaying it.
#[handler]
pub(crate) async fn error_logging(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    ctrl.call_next(req, depot, res).await;

    let status = res.status_code.unwrap_or(StatusCode::OK);

    if !status.is_client_error() && !status.is_server_error() {
        return;
    }

    let Ok(state) = depot.obtain::<Arc<State>>() else {
        warn!("application state missing, error response not recorded");

        return;
    };

    let entry = NewErrorLog {
        method: req.method().to_string(),
        path: req.uri().path().to_owned(),
        status: status.as_u16(),
        message: logged_message(status, &res.body),
        user_uuid: depot.current_user().map(|user| user.uuid),
        request_id: depot
            .get::<String>(REQUEST_ID_DEPOT_KEY)
            .ok()
            .and_then(|request_id| Uuid::parse_str(request_id).ok()),
    };

    let error_logs = Arc::clone(&state.app.error_logs);

    tokio::spawn(
        async move {
            if let Err(source) = error_logs.record_error(entry).await {
                warn!("failed to record error log entry: {source}");
            }
        }
        .in_current_span(),
    );
}

/// Internal detail is kept here even when the caller only sees a generic message.
fn logged_message(status: StatusCode, body: &ResBody) -> String {
    match body {
        ResBody::Error(error) => error.detail.clone().unwrap_or_else(|| error.brief.clone()),
        _ => status
            .canonical_reason()
            .map_or_else(|| status.to_string(), ToOwned::to_owned),
    }
}
