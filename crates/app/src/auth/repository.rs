//! Auth repository.

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    auth::{
        ApiTokenVersion,
        models::{ActiveApiToken, ApiTokenMetadata, NewApiToken},
    },
    domain::users::records::{UserRole, UserUuid},
};

const FIND_ACTIVE_API_TOKEN_SQL: &str = include_str!("sql/find_active_api_token.sql");
const CREATE_API_TOKEN_SQL: &str = include_str!("sql/create_api_token.sql");
const LIST_API_TOKENS_SQL: &str = include_str!("sql/list_api_tokens.sql");
const REVOKE_API_TOKEN_SQL: &str = include_str!("sql/revoke_api_token.sql");
const TOUCH_API_TOKEN_SQL: &str = include_str!("sql/touch_api_token.sql");

#[derive(Debug, Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn find_active_api_token(
        &self,
        token_uuid: Uuid,
        version: ApiTokenVersion,
    ) -> Result<Option<ActiveApiToken>, sqlx::Error> {
        query_as::<Postgres, ActiveApiToken>(FIND_ACTIVE_API_TOKEN_SQL)
            .bind(token_uuid)
            .bind(version.as_i16())
            .fetch_optional(&self.pool)
            .await
    }

    pub(crate) async fn create_api_token(
        &self,
        token: &NewApiToken,
    ) -> Result<ApiTokenMetadata, sqlx::Error> {
        query_as::<Postgres, ApiTokenMetadata>(CREATE_API_TOKEN_SQL)
            .bind(token.uuid)
            .bind(token.user_uuid.into_uuid())
            .bind(token.version.as_i16())
            .bind(&token.verifier)
            .bind(token.expires_at.map(SqlxTimestamp::from))
            .fetch_one(&self.pool)
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_api_tokens(
        &self,
        user: UserUuid,
    ) -> Result<Vec<ApiTokenMetadata>, sqlx::Error> {
        query_as::<Postgres, ApiTokenMetadata>(LIST_API_TOKENS_SQL)
            .bind(user.into_uuid())
            .fetch_all(&self.pool)
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn revoke_api_token(
        &self,
        token_uuid: Uuid,
    ) -> Result<Option<ApiTokenMetadata>, sqlx::Error> {
        query_as::<Postgres, ApiTokenMetadata>(REVOKE_API_TOKEN_SQL)
            .bind(token_uuid)
            .fetch_optional(&self.pool)
            .await
    }

    pub(crate) async fn touch_api_token(&self, token_uuid: Uuid) -> Result<(), sqlx::Error> {
        query(TOUCH_API_TOKEN_SQL)
            .bind(token_uuid)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

fn decode_version(row: &PgRow) -> sqlx::Result<ApiTokenVersion> {
    ApiTokenVersion::try_from(row.try_get::<i16, _>("version")?).map_err(|e| {
        sqlx::Error::ColumnDecode {
            index: "version".to_string(),
            source: Box::new(e),
        }
    })
}

fn optional_timestamp(row: &PgRow, column: &str) -> sqlx::Result<Option<Timestamp>> {
    Ok(row
        .try_get::<Option<SqlxTimestamp>, _>(column)?
        .map(SqlxTimestamp::to_jiff))
}

impl<'r> FromRow<'r, PgRow> for ActiveApiToken {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let role: String = row.try_get("role")?;

        Ok(Self {
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            role: role
                .parse::<UserRole>()
                .map_err(|e| sqlx::Error::ColumnDecode {
                    index: "role".to_string(),
                    source: Box::new(e),
                })?,
            verifier: row.try_get("verifier")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for ApiTokenMetadata {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get("uuid")?,
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            version: decode_version(row)?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            last_used_at: optional_timestamp(row, "last_used_at")?,
            expires_at: optional_timestamp(row, "expires_at")?,
            revoked_at: optional_timestamp(row, "revoked_at")?,
        })
    }
}
