//! Update Promotion Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use crate::{
    extensions::*,
    promotions::{
        errors::into_status_error, requests::PromotionRequest, responses::PromotionResponse,
    },
    response::ApiResponse,
    state::State,
};

/// Update Promotion Handler
///
/// Fields present in the body replace the stored ones. The merged promotion
/// must still be valid.
#[endpoint(
    tags("promotions"),
    summary = "Update Promotion",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Promotion updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid fields"),
        (status_code = StatusCode::NOT_FOUND, description = "Promotion not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<Uuid>,
    json: JsonBody<PromotionRequest>,
    depot: &mut Depot,
) -> Result<Json<ApiResponse<PromotionResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let update = json.into_inner().into_update()?;

    let promotion = state
        .app
        .promotions
        .update_promotion(id.into_inner().into(), update)
        .await
        .map_err(into_status_error)?;

    Ok(Json(ApiResponse::with_message(
        "Promotion updated successfully",
        promotion.into(),
    )))
}
