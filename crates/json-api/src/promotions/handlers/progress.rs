//! Update Progress Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};

use crate::{
    extensions::*,
    observability::{ParticipationEvent, observe_participation},
    promotions::{
        errors::{into_status_error, outcome},
        requests::UpdateProgressRequest,
        responses::ProgressUpdateResponse,
    },
    response::ApiResponse,
    state::State,
};

/// Update Progress Handler
///
/// Adds a positive increment to the caller's progress. Reaching the target
/// while participating marks the caller as the winner.
#[endpoint(
    tags("promotions"),
    summary = "Update Progress",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Progress updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid increment or not participating"),
        (status_code = StatusCode::NOT_FOUND, description = "Promotion not found"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<UpdateProgressRequest>,
    depot: &mut Depot,
) -> Result<Json<ApiResponse<ProgressUpdateResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;

    let request = json.into_inner();

    let result = state
        .app
        .promotions
        .update_progress(request.promotion_id.into(), user.uuid, request.increment)
        .await;

    observe_participation(ParticipationEvent::Progress, outcome(&result));

    let receipt = result.map_err(into_status_error)?;

    Ok(Json(ApiResponse::with_message(
        "Progress updated successfully",
        receipt.into(),
    )))
}
