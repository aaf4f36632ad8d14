//! Error log service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;

use crate::domain::error_logs::{
    data::NewErrorLog, errors::ErrorLogServiceError, repository::PgErrorLogsRepository,
};

#[derive(Debug, Clone)]
pub struct PgErrorLogService {
    repository: PgErrorLogsRepository,
}

impl PgErrorLogService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgErrorLogsRepository::new(pool),
        }
    }
}

#[async_trait]
impl ErrorLogService for PgErrorLogService {
    async fn record_error(&self, entry: NewErrorLog) -> Result<(), ErrorLogServiceError> {
        Ok(self.repository.record_error(entry).await?)
    }
}

#[automock]
#[async_trait]
pub trait ErrorLogService: Send + Sync {
    /// Persist a failed request.
    async fn record_error(&self, entry: NewErrorLog) -> Result<(), ErrorLogServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;
    use uuid::Uuid;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn record_error_inserts_a_row() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.error_logs
            .record_error(NewErrorLog {
                method: "POST".to_string(),
                path: "/api/v1/promotion".to_string(),
                status: 400,
                message: "Missing required fields: title".to_string(),
                user_uuid: None,
                request_id: Some(Uuid::now_v7()),
            })
            .await?;

        let (count, status): (i64, i32) =
            sqlx::query_as("SELECT COUNT(*), MAX(status) FROM error_logs")
                .fetch_one(ctx.db.pool())
                .await?;

        assert_eq!(count, 1);
        assert_eq!(status, 400);

        Ok(())
    }
}
