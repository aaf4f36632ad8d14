//! App Router

use std::sync::Arc;

use salvo::{
    affix_state::inject,
    oapi::{
        OpenApi,
        security::{Http, HttpAuthScheme, SecurityScheme},
        swagger_ui::SwaggerUi,
    },
    prelude::*,
    trailing_slash::remove_slash,
};

use crate::{
    auth,
    catcher::catcher,
    healthcheck,
    observability::{error_logging, metrics_handler, request_logging},
    promotions::{active, create, delete, get, index, join, mine, participants, progress, update},
    state::State,
};

/// Routes, middleware and API docs.
pub(crate) fn app_router(state: Arc<State>) -> Router {
    let router = Router::new()
        .hoop(CatchPanic::new())
        .hoop(inject(state))
        .hoop(request_logging)
        .hoop(error_logging)
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("metrics").get(metrics_handler))
        .push(Router::with_path("api/v1/promotion").push(promotion_routes()));

    let doc = OpenApi::new("RAVE Promotions API", env!("CARGO_PKG_VERSION"))
        .add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
        .merge_router(&router);

    router
        .push(doc.into_router("/api-doc/openapi.json"))
        .push(SwaggerUi::new("/api-doc/openapi.json").into_router("docs"))
}

/// Static segments are registered ahead of `{id}` so they win the match.
fn promotion_routes() -> Router {
    Router::new()
        .push(Router::with_path("active").get(active::handler))
        .push(
            Router::new()
                .hoop(auth::middleware::handler)
                .push(Router::with_path("my-promotions").get(mine::handler))
                .push(Router::with_path("update-progress").post(progress::handler))
                .push(Router::with_path("{id}/join").post(join::handler))
                .push(
                    Router::new()
                        .hoop(auth::middleware::require_admin)
                        .get(index::handler)
                        .post(create::handler)
                        .push(
                            Router::with_path("{id}")
                                .get(get::handler)
                                .put(update::handler)
                                .delete(delete::handler)
                                .push(
                                    Router::with_path("participants")
                                        .get(participants::handler),
                                ),
                        ),
                ),
        )
}

/// Wrap the router with slash normalisation and the JSON error envelope.
pub(crate) fn app_service(router: Router) -> Service {
    Service::new(router)
        .hoop(remove_slash())
        .catcher(catcher())
}

#[cfg(test)]
mod tests {
    use salvo::{
        http::header::AUTHORIZATION,
        test::{ResponseExt, TestClient},
    };
    use serde_json::Value;
    use testresult::TestResult;

    use rave_app::{
        auth::{CurrentUser, MockAuthService},
        domain::{
            promotions::{MockPromotionsService, PromotionsServiceError, records::PromotionUuid},
            users::records::{UserRole, UserUuid},
        },
    };

    use crate::{
        response::ErrorResponse,
        test_helpers::{TEST_ADMIN, TEST_USER, make_promotion, state_with_promotions_and_auth},
    };

    use super::*;

    fn auth_as(user: CurrentUser) -> MockAuthService {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer().returning(move |_| Ok(user));

        auth
    }

    fn make_service(promotions: MockPromotionsService, auth: MockAuthService) -> Service {
        app_service(app_router(state_with_promotions_and_auth(promotions, auth)))
    }

    #[tokio::test]
    async fn active_promotions_are_public() -> TestResult {
        let mut promotions = MockPromotionsService::new();

        promotions
            .expect_list_active_promotions()
            .once()
            .return_once(|_| Ok(vec![make_promotion(PromotionUuid::new())]));

        let mut auth = MockAuthService::new();
        auth.expect_authenticate_bearer().never();

        let mut res = TestClient::get("http://example.com/api/v1/promotion/active")
            .send(&make_service(promotions, auth))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

        Ok(())
    }

    #[tokio::test]
    async fn my_promotions_is_not_captured_by_id_route() -> TestResult {
        let mut promotions = MockPromotionsService::new();

        promotions
            .expect_my_participation()
            .once()
            .withf(|user| *user == TEST_USER.uuid)
            .return_once(|_| Ok(vec![]));

        promotions.expect_get_promotion().never();

        let res = TestClient::get("http://example.com/api/v1/promotion/my-promotions")
            .add_header(AUTHORIZATION, "Bearer user-token", true)
            .send(&make_service(promotions, auth_as(TEST_USER)))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn listing_requires_a_token() -> TestResult {
        let promotions = MockPromotionsService::new();

        let mut auth = MockAuthService::new();
        auth.expect_authenticate_bearer().never();

        let mut res = TestClient::get("http://example.com/api/v1/promotion")
            .send(&make_service(promotions, auth))
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
        assert!(!body.success, "error responses are unsuccessful");

        Ok(())
    }

    #[tokio::test]
    async fn admin_routes_reject_other_roles() -> TestResult {
        let promotions = MockPromotionsService::new();

        let agent = CurrentUser {
            uuid: UserUuid::new(),
            role: UserRole::SalesAgent,
        };

        let mut res = TestClient::delete(format!(
            "http://example.com/api/v1/promotion/{}",
            PromotionUuid::new()
        ))
        .add_header(AUTHORIZATION, "Bearer agent-token", true)
        .send(&make_service(promotions, auth_as(agent)))
        .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));
        assert_eq!(body.message, "Admin access required");

        Ok(())
    }

    #[tokio::test]
    async fn any_authenticated_user_can_join() -> TestResult {
        let uuid = PromotionUuid::new();

        let mut promotions = MockPromotionsService::new();

        promotions
            .expect_join_promotion()
            .once()
            .withf(move |promotion, user, _| *promotion == uuid && *user == TEST_USER.uuid)
            .return_once(|_, _, _| Err(PromotionsServiceError::NotFound));

        let res = TestClient::post(format!("http://example.com/api/v1/promotion/{uuid}/join"))
            .add_header(AUTHORIZATION, "Bearer user-token", true)
            .send(&make_service(promotions, auth_as(TEST_USER)))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn admin_reaches_participants() -> TestResult {
        let uuid = PromotionUuid::new();

        let mut promotions = MockPromotionsService::new();

        promotions
            .expect_list_participants()
            .once()
            .withf(move |promotion| *promotion == uuid)
            .return_once(|_| Ok(vec![]));

        let res = TestClient::get(format!(
            "http://example.com/api/v1/promotion/{uuid}/participants"
        ))
        .add_header(AUTHORIZATION, "Bearer admin-token", true)
        .send(&make_service(promotions, auth_as(TEST_ADMIN)))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn healthcheck_and_openapi_are_served() -> TestResult {
        let service = make_service(MockPromotionsService::new(), MockAuthService::new());

        let health = TestClient::get("http://example.com/healthcheck")
            .send(&service)
            .await;

        let mut doc = TestClient::get("http://example.com/api-doc/openapi.json")
            .send(&service)
            .await;

        let doc = doc.take_string().await?;

        assert_eq!(health.status_code, Some(StatusCode::OK));
        assert!(doc.contains("RAVE Promotions API"), "missing api title");
        assert!(doc.contains("/api/v1/promotion/{id}/join"), "missing join route");

        Ok(())
    }
}
