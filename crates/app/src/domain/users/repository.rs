//! Users Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::domain::users::{
    data::NewUser,
    records::{UserRecord, UserRole, UserUuid},
};

const CREATE_USER_SQL: &str = include_str!("sql/create_user.sql");
const GET_USER_SQL: &str = include_str!("sql/get_user.sql");
const FIND_USERS_SQL: &str = include_str!("sql/find_users.sql");

#[derive(Debug, Clone)]
pub(crate) struct PgUsersRepository {
    pool: PgPool,
}

impl PgUsersRepository {
    #[must_use]
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn create_user(&self, user: NewUser) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(CREATE_USER_SQL)
            .bind(user.uuid.into_uuid())
            .bind(user.name)
            .bind(user.email)
            .bind(user.role.as_str())
            .fetch_one(&self.pool)
            .await
    }

    pub(crate) async fn get_user(&self, user: UserUuid) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(GET_USER_SQL)
            .bind(user.into_uuid())
            .fetch_one(&self.pool)
            .await
    }

    pub(crate) async fn find_users(&self, users: &[UserUuid]) -> Result<Vec<UserRecord>, sqlx::Error> {
        let uuids: Vec<Uuid> = users.iter().map(|user| user.into_uuid()).collect();

        query_as::<Postgres, UserRecord>(FIND_USERS_SQL)
            .bind(uuids)
            .fetch_all(&self.pool)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for UserRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let role: String = row.try_get("role")?;

        let role = role
            .parse::<UserRole>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "role".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: UserUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            role,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
