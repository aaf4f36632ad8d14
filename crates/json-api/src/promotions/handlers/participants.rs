//! Promotion Participants Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    promotions::{errors::into_status_error, responses::ParticipantDetailsResponse},
    response::ApiResponse,
    state::State,
};

/// Promotion Participants Handler
///
/// Participants in join order. `user` is `null` for accounts that no longer
/// exist.
#[endpoint(
    tags("promotions"),
    summary = "List Promotion Participants",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    id: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ApiResponse<Vec<ParticipantDetailsResponse>>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let participants = state
        .app
        .promotions
        .list_participants(id.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(ApiResponse::data(
        participants.into_iter().map(Into::into).collect(),
    )))
}
