//! Promotions Service

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rustc_hash::FxHashMap;
use tracing::{info, warn};

use crate::{
    database::Db,
    domain::{
        promotions::{
            PromotionsServiceError,
            data::{
                JoinReceipt, MyParticipation, NewPromotion, Page, PageRequest, ParticipantDetails,
                ProgressReceipt, PromotionDraft, PromotionFilter, PromotionUpdate,
            },
            participation::validate_increment,
            records::{ParticipantStatus, PromotionRecord, PromotionUuid},
            repository::PgPromotionsRepository,
        },
        users::{
            UsersService,
            records::{UserRecord, UserUuid},
        },
    },
};

#[derive(Clone)]
pub struct PgPromotionsService {
    db: Db,
    promotions: PgPromotionsRepository,
    users: Arc<dyn UsersService>,
}

impl std::fmt::Debug for PgPromotionsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgPromotionsService")
            .field("db", &self.db)
            .finish_non_exhaustive()
    }
}

impl PgPromotionsService {
    #[must_use]
    pub fn new(db: Db, users: Arc<dyn UsersService>) -> Self {
        Self {
            db,
            promotions: PgPromotionsRepository::new(),
            users,
        }
    }
}

#[async_trait]
impl PromotionsService for PgPromotionsService {
    #[tracing::instrument(
        name = "promotions.service.create_promotion",
        skip(self, draft),
        fields(promotion_uuid = tracing::field::Empty),
        err
    )]
    async fn create_promotion(
        &self,
        draft: PromotionDraft,
    ) -> Result<PromotionRecord, PromotionsServiceError> {
        let promotion = NewPromotion::from_draft(PromotionUuid::new(), draft)?;

        tracing::Span::current().record("promotion_uuid", tracing::field::display(promotion.uuid));

        let mut tx = self.db.begin().await?;

        let record = self.promotions.create_promotion(&mut tx, &promotion).await?;

        tx.commit().await?;

        info!(promotion_uuid = %record.uuid, kind = %record.kind, "created promotion");

        Ok(record)
    }

    async fn get_promotion(
        &self,
        promotion: PromotionUuid,
    ) -> Result<PromotionRecord, PromotionsServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.promotions.get_promotion(&mut tx, promotion).await?;

        tx.commit().await?;

        Ok(record)
    }

    #[tracing::instrument(
        name = "promotions.service.update_promotion",
        skip(self, update),
        fields(promotion_uuid = %promotion),
        err
    )]
    async fn update_promotion(
        &self,
        promotion: PromotionUuid,
        update: PromotionUpdate,
    ) -> Result<PromotionRecord, PromotionsServiceError> {
        let mut tx = self.db.begin().await?;

        let mut record = self.promotions.lock_promotion(&mut tx, promotion).await?;

        record.apply_update(update)?;

        let updated = self.promotions.update_promotion(&mut tx, &record).await?;

        tx.commit().await?;

        info!(promotion_uuid = %promotion, "updated promotion");

        Ok(updated)
    }

    #[tracing::instrument(
        name = "promotions.service.delete_promotion",
        skip(self),
        fields(promotion_uuid = %promotion),
        err
    )]
    async fn delete_promotion(&self, promotion: PromotionUuid) -> Result<(), PromotionsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.promotions.delete_promotion(&mut tx, promotion).await?;

        if rows_affected == 0 {
            return Err(PromotionsServiceError::NotFound);
        }

        tx.commit().await?;

        info!(promotion_uuid = %promotion, "deleted promotion");

        Ok(())
    }

    async fn list_promotions(
        &self,
        filter: PromotionFilter,
        page: PageRequest,
    ) -> Result<Page<PromotionRecord>, PromotionsServiceError> {
        let mut tx = self.db.begin().await?;

        let total = self.promotions.count_promotions(&mut tx, filter).await?;
        let items = self.promotions.list_promotions(&mut tx, filter, page).await?;

        tx.commit().await?;

        Ok(Page::new(items, total, page))
    }

    async fn list_active_promotions(
        &self,
        now: Timestamp,
    ) -> Result<Vec<PromotionRecord>, PromotionsServiceError> {
        let mut tx = self.db.begin().await?;

        let records = self.promotions.list_active_promotions(&mut tx, now).await?;

        tx.commit().await?;

        Ok(records)
    }

    #[tracing::instrument(
        name = "promotions.service.join_promotion",
        skip(self),
        fields(promotion_uuid = %promotion, user_uuid = %user),
        err
    )]
    async fn join_promotion(
        &self,
        promotion: PromotionUuid,
        user: UserUuid,
        now: Timestamp,
    ) -> Result<JoinReceipt, PromotionsServiceError> {
        let mut tx = self.db.begin().await?;

        let mut record = self.promotions.lock_promotion(&mut tx, promotion).await?;

        let position = record.participants.len();

        let receipt = record.join(user, now)?;

        if let Some(participant) = record.participants.last() {
            self.promotions
                .insert_participant(&mut tx, promotion, position, participant)
                .await?;
        }

        tx.commit().await?;

        info!(
            promotion_uuid = %promotion,
            user_uuid = %user,
            participant_count = record.participants.len(),
            "joined promotion"
        );

        Ok(receipt)
    }

    #[tracing::instrument(
        name = "promotions.service.update_progress",
        skip(self),
        fields(promotion_uuid = %promotion, user_uuid = %user),
        err
    )]
    async fn update_progress(
        &self,
        promotion: PromotionUuid,
        user: UserUuid,
        increment: f64,
    ) -> Result<ProgressReceipt, PromotionsServiceError> {
        validate_increment(increment)?;

        let mut tx = self.db.begin().await?;

        let mut record = self.promotions.lock_promotion(&mut tx, promotion).await?;

        let previous = record.participant(user).map(|participant| participant.status);

        let receipt = record.record_progress(user, increment)?;

        let participant = record
            .participant(user)
            .ok_or(PromotionsServiceError::MissingParticipant { promotion, user })?;

        self.promotions
            .update_participant(&mut tx, promotion, participant)
            .await?;

        tx.commit().await?;

        if receipt.status == ParticipantStatus::Won && previous != Some(ParticipantStatus::Won) {
            info!(promotion_uuid = %promotion, user_uuid = %user, "participant reached target");
        }

        Ok(receipt)
    }

    async fn list_participants(
        &self,
        promotion: PromotionUuid,
    ) -> Result<Vec<ParticipantDetails>, PromotionsServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.promotions.get_promotion(&mut tx, promotion).await?;

        tx.commit().await?;

        let user_uuids: Vec<UserUuid> = record
            .participants
            .iter()
            .map(|participant| participant.user_uuid)
            .collect();

        let mut users: FxHashMap<UserUuid, UserRecord> = self
            .users
            .find_users(&user_uuids)
            .await?
            .into_iter()
            .map(|user| (user.uuid, user))
            .collect();

        let details = record
            .participants
            .into_iter()
            .map(|participant| {
                let user = users.remove(&participant.user_uuid);

                if user.is_none() {
                    warn!(
                        promotion_uuid = %promotion,
                        user_uuid = %participant.user_uuid,
                        "participant references an unknown user"
                    );
                }

                ParticipantDetails { participant, user }
            })
            .collect();

        Ok(details)
    }

    async fn my_participation(
        &self,
        user: UserUuid,
    ) -> Result<Vec<MyParticipation>, PromotionsServiceError> {
        let mut tx = self.db.begin().await?;

        let records = self.promotions.list_joined_promotions(&mut tx, user).await?;

        tx.commit().await?;

        records
            .iter()
            .map(|record| {
                record
                    .participation_of(user)
                    .ok_or(PromotionsServiceError::MissingParticipant {
                        promotion: record.uuid,
                        user,
                    })
            })
            .collect()
    }
}

#[automock]
#[async_trait]
pub trait PromotionsService: Send + Sync {
    /// Validate and store a new promotion.
    async fn create_promotion(
        &self,
        draft: PromotionDraft,
    ) -> Result<PromotionRecord, PromotionsServiceError>;

    /// Retrieve a promotion with its participants.
    async fn get_promotion(
        &self,
        promotion: PromotionUuid,
    ) -> Result<PromotionRecord, PromotionsServiceError>;

    /// Overlay an update and store the result if the merged record is valid.
    async fn update_promotion(
        &self,
        promotion: PromotionUuid,
        update: PromotionUpdate,
    ) -> Result<PromotionRecord, PromotionsServiceError>;

    /// Delete a promotion and every participant entry.
    async fn delete_promotion(&self, promotion: PromotionUuid) -> Result<(), PromotionsServiceError>;

    /// Filtered, newest-first page of promotions.
    async fn list_promotions(
        &self,
        filter: PromotionFilter,
        page: PageRequest,
    ) -> Result<Page<PromotionRecord>, PromotionsServiceError>;

    /// Promotions that are active and whose window contains `now`.
    async fn list_active_promotions(
        &self,
        now: Timestamp,
    ) -> Result<Vec<PromotionRecord>, PromotionsServiceError>;

    /// Add `user` to a promotion.
    async fn join_promotion(
        &self,
        promotion: PromotionUuid,
        user: UserUuid,
        now: Timestamp,
    ) -> Result<JoinReceipt, PromotionsServiceError>;

    /// Add to a participant's progress.
    async fn update_progress(
        &self,
        promotion: PromotionUuid,
        user: UserUuid,
        increment: f64,
    ) -> Result<ProgressReceipt, PromotionsServiceError>;

    /// Participants in join order, with their users resolved.
    async fn list_participants(
        &self,
        promotion: PromotionUuid,
    ) -> Result<Vec<ParticipantDetails>, PromotionsServiceError>;

    /// Every promotion `user` participates in, seen through their own entry.
    async fn my_participation(
        &self,
        user: UserUuid,
    ) -> Result<Vec<MyParticipation>, PromotionsServiceError>;
}
