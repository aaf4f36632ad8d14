//! Join Promotion Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    observability::{ParticipationEvent, observe_participation},
    promotions::{
        errors::{into_status_error, outcome},
        responses::JoinResponse,
    },
    response::ApiResponse,
    state::State,
};

/// Join Promotion Handler
///
/// Adds the caller to an active, running promotion that still has room.
#[endpoint(
    tags("promotions"),
    summary = "Join Promotion",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Joined"),
        (status_code = StatusCode::BAD_REQUEST, description = "Inactive, outside its window, full or already joined"),
        (status_code = StatusCode::NOT_FOUND, description = "Promotion not found"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ApiResponse<JoinResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;

    let result = state
        .app
        .promotions
        .join_promotion(id.into_inner().into(), user.uuid, Timestamp::now())
        .await;

    observe_participation(ParticipationEvent::Join, outcome(&result));

    let receipt = result.map_err(into_status_error)?;

    Ok(Json(ApiResponse::with_message(
        "Successfully joined promotion",
        receipt.into(),
    )))
}
