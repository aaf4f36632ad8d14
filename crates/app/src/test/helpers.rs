//! Test Helpers

use jiff::{Timestamp, ToSpan};

use crate::{
    domain::{
        promotions::{
            PromotionsService, PromotionsServiceError,
            data::PromotionDraft,
            records::{PromotionKind, PromotionRecord},
        },
        users::{
            UsersService, UsersServiceError,
            data::NewUser,
            records::{UserRecord, UserRole, UserUuid},
        },
    },
    test::TestContext,
};

/// A complete draft whose window runs from an hour ago to ten days from now.
pub(crate) fn running_draft(title: &str) -> PromotionDraft {
    let now = Timestamp::now();

    PromotionDraft {
        title: Some(title.to_string()),
        description: Some(format!("{title} description")),
        kind: Some(PromotionKind::Contest),
        reward: Some("Gift card".to_string()),
        criteria: Some("Hit the target".to_string()),
        target_amount: Some(100.0),
        start_date: now.checked_sub(1.hour()).ok(),
        end_date: now.checked_add(240.hours()).ok(),
        ..PromotionDraft::default()
    }
}

pub(crate) async fn create_promotion(
    ctx: &TestContext,
    draft: PromotionDraft,
) -> Result<PromotionRecord, PromotionsServiceError> {
    ctx.promotions.create_promotion(draft).await
}

pub(crate) async fn create_user(
    ctx: &TestContext,
    name: &str,
    role: UserRole,
) -> Result<UserRecord, UsersServiceError> {
    ctx.users
        .create_user(NewUser {
            uuid: UserUuid::new(),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            role,
        })
        .await
}
