//! Error log service errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ErrorLogServiceError {
    #[error("storage error")]
    Sql(#[from] sqlx::Error),
}
