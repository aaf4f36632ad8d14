//! Error Logs Repository

use sqlx::{PgPool, query};
use uuid::Uuid;

use crate::domain::error_logs::data::NewErrorLog;

const RECORD_ERROR_SQL: &str = include_str!("sql/record_error.sql");

#[derive(Debug, Clone)]
pub(crate) struct PgErrorLogsRepository {
    pool: PgPool,
}

impl PgErrorLogsRepository {
    #[must_use]
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn record_error(&self, entry: NewErrorLog) -> Result<(), sqlx::Error> {
        query(RECORD_ERROR_SQL)
            .bind(Uuid::now_v7())
            .bind(entry.method)
            .bind(entry.path)
            .bind(i32::from(entry.status))
            .bind(entry.message)
            .bind(entry.user_uuid.map(Uuid::from))
            .bind(entry.request_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
