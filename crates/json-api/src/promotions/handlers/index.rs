//! Promotion Index Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    promotions::{
        errors::into_status_error, requests::ListPromotionsQuery, responses::PromotionResponse,
    },
    response::{ApiResponse, Pagination},
    state::State,
};

/// Promotion Index Handler
///
/// Newest-first page of promotions. Query: `page` (default 1), `limit`
/// (default 10, at most 100), `type`, `isActive`.
#[endpoint(
    tags("promotions"),
    summary = "List Promotions",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<ApiResponse<Vec<PromotionResponse>>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let query = req
        .parse_queries::<ListPromotionsQuery>()
        .map_err(|error| {
            StatusError::bad_request().brief(format!("invalid query parameters: {error}"))
        })?;

    let (filter, page) = query.into_parts()?;

    let page = state
        .app
        .promotions
        .list_promotions(filter, page)
        .await
        .map_err(into_status_error)?;

    let pagination = Pagination::from(&page);

    Ok(Json(ApiResponse::paginated(
        page.items.into_iter().map(Into::into).collect(),
        pagination,
    )))
}
