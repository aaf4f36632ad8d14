//! Delete Promotion Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    extensions::*,
    promotions::{errors::into_status_error, responses::DeletedPromotionResponse},
    response::ApiResponse,
    state::State,
};

/// Delete Promotion Handler
///
/// Deletes a promotion together with its participants.
#[endpoint(
    tags("promotions"),
    summary = "Delete Promotion",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    id: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ApiResponse<DeletedPromotionResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let id = id.into_inner();

    state
        .app
        .promotions
        .delete_promotion(id.into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(ApiResponse::with_message(
        "Promotion deleted successfully",
        DeletedPromotionResponse { id },
    )))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use rave_app::domain::promotions::{
        MockPromotionsService, PromotionsServiceError, records::PromotionUuid,
    };

    use crate::test_helpers::{TEST_ADMIN, promotions_service_as};

    use super::*;

    fn make_service(promotions: MockPromotionsService) -> Service {
        promotions_service_as(
            TEST_ADMIN,
            promotions,
            Router::with_path("promotion/{id}").delete(handler),
        )
    }

    #[tokio::test]
    async fn test_delete_promotion_success() -> TestResult {
        let uuid = PromotionUuid::new();

        let mut promotions = MockPromotionsService::new();

        promotions
            .expect_delete_promotion()
            .once()
            .withf(move |id| *id == uuid)
            .return_once(|_| Ok(()));

        let mut res = TestClient::delete(format!("http://example.com/promotion/{uuid}"))
            .send(&make_service(promotions))
            .await;

        let body: ApiResponse<DeletedPromotionResponse> = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.message.as_deref(), Some("Promotion deleted successfully"));
        assert_eq!(body.data.map(|data| data.id), Some(uuid.into_uuid()));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_promotion_returns_404() -> TestResult {
        let mut promotions = MockPromotionsService::new();

        promotions
            .expect_delete_promotion()
            .once()
            .return_once(|_| Err(PromotionsServiceError::NotFound));

        let res = TestClient::delete(format!(
            "http://example.com/promotion/{}",
            PromotionUuid::new()
        ))
        .send(&make_service(promotions))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
