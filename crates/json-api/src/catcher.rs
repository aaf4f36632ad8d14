//! Error envelope rendering.
//!
//! Handlers and middleware fail with [`StatusError`]; the catcher turns whatever
//! error reached the response into `{ "success": false, "message": ... }`.

use salvo::{
    catcher::Catcher,
    http::{ResBody, StatusCode},
    prelude::*,
};

use crate::{observability, response::ErrorResponse};

const GENERIC_SERVER_ERROR: &str = "Internal server error";

/// Catcher that renders the JSON error envelope.
pub(crate) fn catcher() -> Catcher {
    Catcher::default().hoop(render_error)
}

#[handler]
async fn render_error(res: &mut Response, ctrl: &mut FlowCtrl) {
    let status = res
        .status_code
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let message = match res.take_body() {
        ResBody::Error(error) => client_message(status, error),
        _ => fallback_message(status),
    };

    res.status_code(status);
    res.render(Json(ErrorResponse::new(message)));

    ctrl.skip_rest();
}

/// The message a caller sees. Server errors stay generic outside development.
pub(crate) fn client_message(status: StatusCode, error: StatusError) -> String {
    if status.is_server_error() {
        if observability::expose_internal_errors() {
            return error.detail.unwrap_or(error.brief);
        }

        return GENERIC_SERVER_ERROR.to_owned();
    }

    error.brief
}

fn fallback_message(status: StatusCode) -> String {
    if status.is_server_error() {
        return GENERIC_SERVER_ERROR.to_owned();
    }

    status
        .canonical_reason()
        .map_or_else(|| status.to_string(), ToOwned::to_owned)
}
