//! Active Promotions Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::prelude::*;

use crate::{
    extensions::*,
    promotions::{errors::into_status_error, responses::PromotionResponse},
    response::ApiResponse,
    state::State,
};

/// Active Promotions Handler
///
/// Returns every active promotion whose window contains the current time,
/// newest first. No authentication required.
#[endpoint(tags("promotions"), summary = "List Active Promotions")]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<ApiResponse<Vec<PromotionResponse>>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let promotions = state
        .app
        .promotions
        .list_active_promotions(Timestamp::now())
        .await
        .map_err(into_status_error)?;

    Ok(Json(ApiResponse::data(
        promotions.into_iter().map(Into::into).collect(),
    )))
}
