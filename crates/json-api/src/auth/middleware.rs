//! Auth middleware.

use std::sync::Arc;

use rave_app::auth::AuthServiceError;
use salvo::{http::header::AUTHORIZATION, prelude::*};
use tracing::{debug, error};

use crate::{extensions::*, state::State};

/// Resolve the bearer token to a [`rave_app::auth::CurrentUser`] or reject with 401.
#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(token) = extract_bearer_token(req) else {
        res.render(StatusError::unauthorized().brief("Missing or invalid Authorization header"));

        return;
    };

    let state = match depot.obtain_or_500::<Arc<State>>() {
        Ok(state) => state,
        Err(error) => {
            res.render(error);

            return;
        }
    };

    let user = match state.app.auth.authenticate_bearer(token).await {
        Ok(user) => user,
        Err(AuthServiceError::NotFound | AuthServiceError::UnknownUser) => {
            res.render(StatusError::unauthorized().brief("Invalid API token"));

            return;
        }
        Err(
            error @ (AuthServiceError::Sql(_)
            | AuthServiceError::Token(_)
            | AuthServiceError::OpenBao(_)),
        ) => {
            error!("failed to authenticate api token: {error:?}");

            res.render(
                StatusError::internal_server_error()
                    .brief("failed to authenticate api token")
                    .detail(format!("failed to authenticate api token: {error}")),
            );

            return;
        }
    };

    debug!(user_uuid = %user.uuid, role = %user.role, "authenticated request");

    depot.insert_current_user(user);

    ctrl.call_next(req, depot, res).await;
}

/// Only administrators pass. Must run after [`handler`].
#[salvo::handler]
pub(crate) async fn require_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let user = match depot.current_user_or_401() {
        Ok(user) => user,
        Err(error) => {
            res.render(error);

            return;
        }
    };

    if !user.is_admin() {
        res.render(StatusError::forbidden().brief("Admin access required"));

        return;
    }

    ctrl.call_next(req, depot, res).await;
}

fn extract_bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}

#[cfg(test)]
mod tests {
    use rave_app::{
        auth::{CurrentUser, MockAuthService},
        domain::users::records::{UserRole, UserUuid},
    };
    use salvo::{
        affix_state::inject,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;
    use uuid::Uuid;

    use crate::{
        catcher::catcher,
        response::ErrorResponse,
        test_helpers::{TEST_ADMIN, TEST_USER, inject_user, state_with_auth},
    };

    use super::*;

    #[salvo::handler]
    async fn echo_user(depot: &mut Depot, res: &mut Response) {
        let user = depot.current_user().map_or_else(
            || "missing".to_string(),
            |user| format!("{}:{}", user.uuid, user.role),
        );

        res.render(user);
    }

    fn make_service(auth: MockAuthService) -> Service {
        let state = state_with_auth(auth);

        let router = Router::new()
            .hoop(inject(state))
            .hoop(handler)
            .push(Router::new().get(echo_user));

        Service::new(router).catcher(catcher())
    }

    fn make_admin_service(user: CurrentUser) -> Service {
        let router = Router::new()
            .hoop(inject_user(user))
            .hoop(require_admin)
            .push(Router::new().get(echo_user));

        Service::new(router).catcher(catcher())
    }

    #[tokio::test]
    async fn test_missing_authorization_header_returns_401() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer().never();

        let mut res = TestClient::get("http://example.com")
            .send(&make_service(auth))
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
        assert_eq!(body.message, "Missing or invalid Authorization header");

        Ok(())
    }

    #[tokio::test]
    async fn test_non_bearer_authorization_header_returns_401() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer().never();

        let res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Basic abc123", true)
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_token_returns_401() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer()
            .once()
            .withf(|token| token == "abc123")
            .return_once(|_| Err(AuthServiceError::NotFound));

        let res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Bearer abc123", true)
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_storage_failure_returns_500() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer()
            .once()
            .return_once(|_| Err(AuthServiceError::Sql(sqlx::Error::PoolTimedOut)));

        let res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Bearer abc123", true)
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }

    #[tokio::test]
    async fn test_valid_token_injects_current_user() -> TestResult {
        let user = CurrentUser {
            uuid: UserUuid::from_uuid(Uuid::now_v7()),
            role: UserRole::SalesAgent,
        };

        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer()
            .once()
            .withf(|token| token == "abc123")
            .return_once(move |_| Ok(user));

        let mut res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "bearer  abc123 ", true)
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(res.take_string().await?, format!("{}:sales_agent", user.uuid));

        Ok(())
    }

    #[tokio::test]
    async fn test_non_admin_is_forbidden() -> TestResult {
        let mut res = TestClient::get("http://example.com")
            .send(&make_admin_service(TEST_USER))
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));
        assert_eq!(body.message, "Admin access required");

        Ok(())
    }

    #[tokio::test]
    async fn test_admin_passes() -> TestResult {
        let res = TestClient::get("http://example.com")
            .send(&make_admin_service(TEST_ADMIN))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_admin_gate_without_authentication_returns_401() -> TestResult {
        let router = Router::new()
            .hoop(require_admin)
            .push(Router::new().get(echo_user));

        let res = TestClient::get("http://example.com")
            .send(&Service::new(router))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }
}
