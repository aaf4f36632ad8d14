//! Promotions Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use rustc_hash::FxHashMap;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::domain::{
    promotions::{
        data::{NewPromotion, PageRequest, PromotionFilter},
        records::{ParticipantRecord, Progress, PromotionRecord, PromotionUuid},
    },
    users::records::UserUuid,
};

const CREATE_PROMOTION_SQL: &str = include_str!("sql/create_promotion.sql");
const GET_PROMOTION_SQL: &str = include_str!("sql/get_promotion.sql");
const LOCK_PROMOTION_SQL: &str = include_str!("sql/lock_promotion.sql");
const UPDATE_PROMOTION_SQL: &str = include_str!("sql/update_promotion.sql");
const DELETE_PROMOTION_SQL: &str = include_str!("sql/delete_promotion.sql");
const LIST_PROMOTIONS_SQL: &str = include_str!("sql/list_promotions.sql");
const COUNT_PROMOTIONS_SQL: &str = include_str!("sql/count_promotions.sql");
const LIST_ACTIVE_PROMOTIONS_SQL: &str = include_str!("sql/list_active_promotions.sql");
const LIST_JOINED_PROMOTIONS_SQL: &str = include_str!("sql/list_joined_promotions.sql");
const LIST_PARTICIPANTS_SQL: &str = include_str!("sql/list_participants.sql");
const INSERT_PARTICIPANT_SQL: &str = include_str!("sql/insert_participant.sql");
const UPDATE_PARTICIPANT_SQL: &str = include_str!("sql/update_participant.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPromotionsRepository;

impl PgPromotionsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_promotion(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promotion: &NewPromotion,
    ) -> Result<PromotionRecord, sqlx::Error> {
        query_as::<Postgres, PromotionRecord>(CREATE_PROMOTION_SQL)
            .bind(promotion.uuid.into_uuid())
            .bind(&promotion.title)
            .bind(&promotion.description)
            .bind(promotion.kind.as_str())
            .bind(&promotion.reward)
            .bind(&promotion.criteria)
            .bind(promotion.target_amount)
            .bind(promotion.target_action.as_str())
            .bind(SqlxTimestamp::from(promotion.start_date))
            .bind(SqlxTimestamp::from(promotion.end_date))
            .bind(promotion.is_active)
            .bind(max_participants_to_db(promotion.max_participants)?)
            .bind(&promotion.image_url)
            .fetch_one(&mut **tx)
            .await
    }

    /// Load a promotion with its participants.
    pub(crate) async fn get_promotion(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promotion: PromotionUuid,
    ) -> Result<PromotionRecord, sqlx::Error> {
        let mut record = query_as::<Postgres, PromotionRecord>(GET_PROMOTION_SQL)
            .bind(promotion.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        record.participants = self.participants_of(tx, promotion).await?;

        Ok(record)
    }

    /// Load a promotion with its participants, holding its row lock until the
    /// transaction ends.
    pub(crate) async fn lock_promotion(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promotion: PromotionUuid,
    ) -> Result<PromotionRecord, sqlx::Error> {
        let mut record = query_as::<Postgres, PromotionRecord>(LOCK_PROMOTION_SQL)
            .bind(promotion.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        record.participants = self.participants_of(tx, promotion).await?;

        Ok(record)
    }

    /// Persist the scalar fields of `promotion`. Participants are stored separately.
    pub(crate) async fn update_promotion(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promotion: &PromotionRecord,
    ) -> Result<PromotionRecord, sqlx::Error> {
        let mut updated = query_as::<Postgres, PromotionRecord>(UPDATE_PROMOTION_SQL)
            .bind(promotion.uuid.into_uuid())
            .bind(&promotion.title)
            .bind(&promotion.description)
            .bind(promotion.kind.as_str())
            .bind(&promotion.reward)
            .bind(&promotion.criteria)
            .bind(promotion.target_amount)
            .bind(promotion.target_action.as_str())
            .bind(SqlxTimestamp::from(promotion.start_date))
            .bind(SqlxTimestamp::from(promotion.end_date))
            .bind(promotion.is_active)
            .bind(max_participants_to_db(promotion.max_participants)?)
            .bind(&promotion.image_url)
            .fetch_one(&mut **tx)
            .await?;

        updated.participants.clone_from(&promotion.participants);

        Ok(updated)
    }

    pub(crate) async fn delete_promotion(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promotion: PromotionUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PROMOTION_SQL)
            .bind(promotion.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    #[tracing::instrument(
        name = "promotions.repository.list_promotions",
        skip(self, tx),
        fields(row_count = tracing::field::Empty),
        err
    )]
    pub(crate) async fn list_promotions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: PromotionFilter,
        page: PageRequest,
    ) -> Result<Vec<PromotionRecord>, sqlx::Error> {
        let offset = i64::try_from(page.offset()).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

        let records = query_as::<Postgres, PromotionRecord>(LIST_PROMOTIONS_SQL)
            .bind(filter.kind.map(|kind| kind.as_str()))
            .bind(filter.is_active)
            .bind(i64::from(page.limit()))
            .bind(offset)
            .fetch_all(&mut **tx)
            .await?;

        tracing::Span::current().record("row_count", records.len());

        self.with_participants(tx, records).await
    }

    pub(crate) async fn count_promotions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: PromotionFilter,
    ) -> Result<u64, sqlx::Error> {
        let total: i64 = query_scalar(COUNT_PROMOTIONS_SQL)
            .bind(filter.kind.map(|kind| kind.as_str()))
            .bind(filter.is_active)
            .fetch_one(&mut **tx)
            .await?;

        u64::try_from(total).map_err(|e| sqlx::Error::Decode(Box::new(e)))
    }

    pub(crate) async fn list_active_promotions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        now: Timestamp,
    ) -> Result<Vec<PromotionRecord>, sqlx::Error> {
        let records = query_as::<Postgres, PromotionRecord>(LIST_ACTIVE_PROMOTIONS_SQL)
            .bind(SqlxTimestamp::from(now))
            .fetch_all(&mut **tx)
            .await?;

        self.with_participants(tx, records).await
    }

    /// Promotions `user` has an entry in, with all their participants.
    pub(crate) async fn list_joined_promotions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<PromotionRecord>, sqlx::Error> {
        let records = query_as::<Postgres, PromotionRecord>(LIST_JOINED_PROMOTIONS_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await?;

        self.with_participants(tx, records).await
    }

    pub(crate) async fn insert_participant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promotion: PromotionUuid,
        position: usize,
        participant: &ParticipantRecord,
    ) -> Result<(), sqlx::Error> {
        let position = i32::try_from(position).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

        query(INSERT_PARTICIPANT_SQL)
            .bind(promotion.into_uuid())
            .bind(participant.user_uuid.into_uuid())
            .bind(position)
            .bind(SqlxTimestamp::from(participant.joined_at))
            .bind(participant.progress.current)
            .bind(participant.progress.target)
            .bind(participant.status.as_str())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn update_participant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promotion: PromotionUuid,
        participant: &ParticipantRecord,
    ) -> Result<(), sqlx::Error> {
        let rows_affected = query(UPDATE_PARTICIPANT_SQL)
            .bind(promotion.into_uuid())
            .bind(participant.user_uuid.into_uuid())
            .bind(participant.progress.current)
            .bind(participant.status.as_str())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Err(sqlx::Error::RowNotFound);
        }

        Ok(())
    }

    async fn participants_of(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promotion: PromotionUuid,
    ) -> Result<Vec<ParticipantRecord>, sqlx::Error> {
        let rows = query_as::<Postgres, ParticipantRow>(LIST_PARTICIPANTS_SQL)
            .bind(vec![promotion.into_uuid()])
            .fetch_all(&mut **tx)
            .await?;

        Ok(rows.into_iter().map(|row| row.participant).collect())
    }

    /// Attach participants to a batch of promotions with a single query.
    async fn with_participants(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        mut records: Vec<PromotionRecord>,
    ) -> Result<Vec<PromotionRecord>, sqlx::Error> {
        if records.is_empty() {
            return Ok(records);
        }

        let uuids: Vec<Uuid> = records.iter().map(|record| record.uuid.into_uuid()).collect();

        let rows = query_as::<Postgres, ParticipantRow>(LIST_PARTICIPANTS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await?;

        let mut by_promotion: FxHashMap<PromotionUuid, Vec<ParticipantRecord>> =
            FxHashMap::default();

        for row in rows {
            by_promotion
                .entry(row.promotion_uuid)
                .or_default()
                .push(row.participant);
        }

        for record in &mut records {
            record.participants = by_promotion.remove(&record.uuid).unwrap_or_default();
        }

        Ok(records)
    }
}

fn max_participants_to_db(max_participants: u32) -> Result<i32, sqlx::Error> {
    i32::try_from(max_participants).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

fn decode_column<T, E>(index: &str, result: Result<T, E>) -> Result<T, sqlx::Error>
where
    E: std::error::Error + Send + Sync + 'static,
{
    result.map_err(|e| sqlx::Error::ColumnDecode {
        index: index.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for PromotionRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let kind: String = row.try_get("kind")?;
        let target_action: String = row.try_get("target_action")?;
        let max_participants: i32 = row.try_get("max_participants")?;

        Ok(Self {
            uuid: PromotionUuid::from_uuid(row.try_get("uuid")?),
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            kind: decode_column("kind", kind.parse())?,
            reward: row.try_get("reward")?,
            criteria: row.try_get("criteria")?,
            target_amount: row.try_get("target_amount")?,
            target_action: decode_column("target_action", target_action.parse())?,
            start_date: row.try_get::<SqlxTimestamp, _>("start_date")?.to_jiff(),
            end_date: row.try_get::<SqlxTimestamp, _>("end_date")?.to_jiff(),
            is_active: row.try_get("is_active")?,
            max_participants: decode_column("max_participants", u32::try_from(max_participants))?,
            image_url: row.try_get("image_url")?,
            participants: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

/// A participant row tagged with the promotion it belongs to.
struct ParticipantRow {
    promotion_uuid: PromotionUuid,
    participant: ParticipantRecord,
}

impl<'r> FromRow<'r, PgRow> for ParticipantRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;

        Ok(Self {
            promotion_uuid: PromotionUuid::from_uuid(row.try_get("promotion_uuid")?),
            participant: ParticipantRecord {
                user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
                joined_at: row.try_get::<SqlxTimestamp, _>("joined_at")?.to_jiff(),
                progress: Progress {
                    current: row.try_get("current_progress")?,
                    target: row.try_get("target_progress")?,
                },
                status: decode_column("status", status.parse())?,
            },
        })
    }
}
