//! Auth service errors.

use sqlx::Error;
use thiserror::Error;

use crate::auth::{ApiTokenError, OpenBaoError};

#[derive(Debug, Error)]
pub enum AuthServiceError {
    /// The token is unknown, expired, revoked or fails verification.
    #[error("token not found")]
    NotFound,

    #[error("user not found")]
    UnknownUser,

    #[error("storage error")]
    Sql(#[source] Error),

    #[error("token processing error")]
    Token(#[from] ApiTokenError),

    #[error("OpenBao error")]
    OpenBao(#[from] OpenBaoError),
}

impl From<Error> for AuthServiceError {
    fn from(error: Error) -> Self {
        if error
            .as_database_error()
            .is_some_and(sqlx::error::DatabaseError::is_foreign_key_violation)
        {
            return Self::UnknownUser;
        }

        Self::Sql(error)
    }
}
