//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use rave_app::{
    auth::{CurrentUser, MockAuthService},
    context::AppContext,
    domain::{
        error_logs::MockErrorLogService,
        promotions::{
            MockPromotionsService,
            records::{
                ParticipantRecord, ParticipantStatus, Progress, PromotionKind, PromotionRecord,
                PromotionUuid, TargetAction,
            },
        },
        users::{
            MockUsersService,
            records::{UserRole, UserUuid},
        },
    },
};

use crate::{catcher::catcher, extensions::*, state::State};

pub(crate) const TEST_USER: CurrentUser = CurrentUser {
    uuid: UserUuid::from_uuid(Uuid::nil()),
    role: UserRole::Creator,
};

pub(crate) const TEST_ADMIN: CurrentUser = CurrentUser {
    uuid: UserUuid::from_uuid(Uuid::max()),
    role: UserRole::Admin,
};

/// Hoop that authenticates every request as the given user.
#[derive(Debug, Clone, Copy)]
pub(crate) struct InjectUser(CurrentUser);

#[salvo::handler]
impl InjectUser {
    async fn handle(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        ctrl: &mut FlowCtrl,
    ) {
        depot.insert_current_user(self.0);
        ctrl.call_next(req, depot, res).await;
    }
}

pub(crate) const fn inject_user(user: CurrentUser) -> InjectUser {
    InjectUser(user)
}

fn strict_promotions_mock() -> MockPromotionsService {
    let mut promotions = MockPromotionsService::new();

    promotions.expect_create_promotion().never();
    promotions.expect_get_promotion().never();
    promotions.expect_update_promotion().never();
    promotions.expect_delete_promotion().never();
    promotions.expect_list_promotions().never();
    promotions.expect_list_active_promotions().never();
    promotions.expect_join_promotion().never();
    promotions.expect_update_progress().never();
    promotions.expect_list_participants().never();
    promotions.expect_my_participation().never();

    promotions
}

fn strict_users_mock() -> MockUsersService {
    let mut users = MockUsersService::new();

    users.expect_create_user().never();
    users.expect_get_user().never();
    users.expect_find_users().never();

    users
}

fn strict_auth_mock() -> MockAuthService {
    let mut auth = MockAuthService::new();

    auth.expect_authenticate_bearer().never();

    auth
}

/// Error log writes are spawned, so tests that don't assert on them accept any.
fn permissive_error_logs_mock() -> MockErrorLogService {
    let mut error_logs = MockErrorLogService::new();

    error_logs.expect_record_error().returning(|_| Ok(()));

    error_logs
}

fn state(
    promotions: MockPromotionsService,
    auth: MockAuthService,
    error_logs: MockErrorLogService,
) -> Arc<State> {
    State::from_app_context(AppContext {
        promotions: Arc::new(promotions),
        users: Arc::new(strict_users_mock()),
        auth: Arc::new(auth),
        error_logs: Arc::new(error_logs),
    })
}

pub(crate) fn state_with_promotions(promotions: MockPromotionsService) -> Arc<State> {
    state(promotions, strict_auth_mock(), permissive_error_logs_mock())
}

pub(crate) fn state_with_promotions_and_auth(
    promotions: MockPromotionsService,
    auth: MockAuthService,
) -> Arc<State> {
    state(promotions, auth, permissive_error_logs_mock())
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    state(strict_promotions_mock(), auth, permissive_error_logs_mock())
}

pub(crate) fn state_with_error_logs(error_logs: MockErrorLogService) -> Arc<State> {
    state(strict_promotions_mock(), strict_auth_mock(), error_logs)
}

/// Serve `route` as `user`, rendering errors through the JSON envelope.
pub(crate) fn promotions_service_as(
    user: CurrentUser,
    promotions: MockPromotionsService,
    route: Router,
) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_promotions(promotions)))
            .hoop(inject_user(user))
            .push(route),
    )
    .catcher(catcher())
}

pub(crate) fn promotions_service(promotions: MockPromotionsService, route: Router) -> Service {
    promotions_service_as(TEST_USER, promotions, route)
}

pub(crate) fn make_promotion(uuid: PromotionUuid) -> PromotionRecord {
    PromotionRecord {
        uuid,
        title: "Spring Sales Sprint".to_string(),
        description: "Close the most deals in April".to_string(),
        kind: PromotionKind::Contest,
        reward: "Weekend trip".to_string(),
        criteria: "Most closed sales".to_string(),
        target_amount: 100.0,
        target_action: TargetAction::Sales,
        start_date: Timestamp::UNIX_EPOCH,
        end_date: Timestamp::MAX,
        is_active: true,
        max_participants: 0,
        image_url: String::new(),
        participants: Vec::new(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_participant(user_uuid: UserUuid, current: f64) -> ParticipantRecord {
    ParticipantRecord {
        user_uuid,
        joined_at: Timestamp::UNIX_EPOCH,
        progress: Progress {
            current,
            target: 100.0,
        },
        status: ParticipantStatus::Participating,
    }
}
