//! Create Promotion Handler

use std::sync::Arc;

use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};

use crate::{
    extensions::*,
    promotions::{
        errors::into_status_error, requests::PromotionRequest, responses::PromotionResponse,
    },
    response::ApiResponse,
    state::State,
};

/// Create Promotion Handler
#[endpoint(
    tags("promotions"),
    summary = "Create Promotion",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Promotion created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Missing or invalid fields"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin access required"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<PromotionRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ApiResponse<PromotionResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let draft = json.into_inner().into_draft()?;

    let promotion = state
        .app
        .promotions
        .create_promotion(draft)
        .await
        .map_err(into_status_error)?;

    res.add_header(
        LOCATION,
        format!("/api/v1/promotion/{}", promotion.uuid),
        true,
    )
    .or_500("failed to set location header")?
    .status_code(StatusCode::CREATED);

    Ok(Json(ApiResponse::with_message(
        "Promotion created successfully",
        promotion.into(),
    )))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use rave_app::domain::promotions::{
        MissingFields, MockPromotionsService, PromotionValidationError, PromotionsServiceError,
        records::{PromotionKind, PromotionUuid, TargetAction},
    };

    use crate::{
        response::ErrorResponse,
        test_helpers::{TEST_ADMIN, make_promotion, promotions_service_as},
    };

    use super::*;

    fn make_service(promotions: MockPromotionsService) -> Service {
        promotions_service_as(
            TEST_ADMIN,
            promotions,
            Router::with_path("promotion").post(handler),
        )
    }

    #[tokio::test]
    async fn test_create_promotion_success() -> TestResult {
        let uuid = PromotionUuid::new();
        let promotion = make_promotion(uuid);

        let mut promotions = MockPromotionsService::new();

        promotions
            .expect_create_promotion()
            .once()
            .withf(|draft| {
                draft.title.as_deref() == Some("Spring Sales Sprint")
                    && draft.kind == Some(PromotionKind::Contest)
                    && draft.target_action == Some(TargetAction::Sales)
                    && draft.target_amount == Some(100.0)
                    && draft.start_date.is_some()
                    && draft.end_date.is_some()
            })
            .return_once(move |_| Ok(promotion));

        let mut res = TestClient::post("http://example.com/promotion")
            .json(&json!({
                "title": "Spring Sales Sprint",
                "description": "Close the most deals in April",
                "type": "contest",
                "reward": "Weekend trip",
                "criteria": "Most closed sales",
                "targetAmount": 100,
                "targetAction": "sales",
                "startDate": "2026-04-01",
                "endDate": "2026-04-30"
            }))
            .send(&make_service(promotions))
            .await;

        let body: ApiResponse<PromotionResponse> = res.take_json().await?;
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location, Some(format!("/api/v1/promotion/{uuid}").as_str()));
        assert_eq!(body.message.as_deref(), Some("Promotion created successfully"));
        assert_eq!(body.data.map(|data| data.id), Some(uuid.into_uuid()));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_promotion_missing_fields_returns_400() -> TestResult {
        let mut promotions = MockPromotionsService::new();

        promotions
            .expect_create_promotion()
            .once()
            .return_once(|_| {
                Err(PromotionsServiceError::Validation(
                    PromotionValidationError::MissingFields(MissingFields::from_slice(&[
                        "title", "reward",
                    ])),
                ))
            });

        let mut res = TestClient::post("http://example.com/promotion")
            .json(&json!({ "type": "bonus" }))
            .send(&make_service(promotions))
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert!(!body.success, "error responses are unsuccessful");
        assert_eq!(body.message, "missing required fields: title, reward");

        Ok(())
    }

    #[tokio::test]
    async fn test_create_promotion_bad_date_is_rejected_before_storage() -> TestResult {
        let promotions = MockPromotionsService::new();

        let mut res = TestClient::post("http://example.com/promotion")
            .json(&json!({ "title": "Spring", "startDate": "next tuesday" }))
            .send(&make_service(promotions))
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body.message, "invalid startDate: next tuesday");

        Ok(())
    }
}
