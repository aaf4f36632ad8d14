//! Get Promotion Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    promotions::{errors::into_status_error, responses::PromotionResponse},
    response::ApiResponse,
    state::State,
};

/// Get Promotion Handler
///
/// Returns a promotion with its participants.
#[endpoint(
    tags("promotions"),
    summary = "Get Promotion",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    id: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ApiResponse<PromotionResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let promotion = state
        .app
        .promotions
        .get_promotion(id.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(ApiResponse::data(promotion.into())))
}
