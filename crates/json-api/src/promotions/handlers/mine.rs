//! My Promotions Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    promotions::{errors::into_status_error, responses::MyPromotionResponse},
    response::ApiResponse,
    state::State,
};

/// My Promotions Handler
///
/// Every promotion the caller has joined, with their own progress and status.
#[endpoint(
    tags("promotions"),
    summary = "List My Promotions",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    depot: &mut Depot,
) -> Result<Json<ApiResponse<Vec<MyPromotionResponse>>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.current_user_or_401()?;

    let entries = state
        .app
        .promotions
        .my_participation(user.uuid)
        .await
        .map_err(into_status_error)?;

    Ok(Json(ApiResponse::data(
        entries.into_iter().map(Into::into).collect(),
    )))
}
