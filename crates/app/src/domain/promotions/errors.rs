//! Promotions service errors.

use smallvec::SmallVec;
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::{
    promotions::records::PromotionUuid,
    users::{UsersServiceError, records::UserUuid},
};

/// Field names reported by [`PromotionValidationError::MissingFields`].
pub type MissingFields = SmallVec<[&'static str; 8]>;

/// A promotion that would violate the record's invariants.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PromotionValidationError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(MissingFields),

    #[error("end date must be after start date")]
    InvalidDateRange,

    #[error("target amount must be a non-negative number")]
    InvalidTargetAmount,

    #[error("max participants must be at most {}", i32::MAX)]
    MaxParticipantsTooLarge,

    #[error("max participants cannot be below the {0} current participants")]
    CapacityBelowParticipants(usize),
}

/// A join or progress update that the participation rules refuse.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ParticipationError {
    #[error("increment must be a positive number")]
    InvalidIncrement,

    #[error("promotion is not active")]
    NotActive,

    #[error("promotion has not started yet")]
    NotStarted,

    #[error("promotion has ended")]
    Ended,

    #[error("already joined this promotion")]
    AlreadyJoined,

    #[error("promotion has reached maximum participants")]
    CapacityExceeded,

    #[error("not participating in this promotion")]
    NotParticipating,
}

#[derive(Debug, Error)]
pub enum PromotionsServiceError {
    #[error("promotion already exists")]
    AlreadyExists,

    #[error("promotion not found")]
    NotFound,

    #[error(transparent)]
    Validation(#[from] PromotionValidationError),

    #[error(transparent)]
    Participation(#[from] ParticipationError),

    #[error("promotion {promotion} has no participant entry for user {user}")]
    MissingParticipant {
        promotion: PromotionUuid,
        user: UserUuid,
    },

    #[error("invalid data")]
    InvalidData,

    #[error("user lookup failed")]
    Users(#[from] UsersServiceError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for PromotionsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::CheckViolation | ErrorKind::NotNullViolation) => Self::InvalidData,
            _ => Self::Sql(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use smallvec::smallvec;

    use super::*;

    #[test]
    fn missing_fields_are_listed_in_one_message() {
        let error = PromotionValidationError::MissingFields(smallvec!["title", "reward"]);

        assert_eq!(error.to_string(), "missing required fields: title, reward");
    }

    #[test]
    fn row_not_found_maps_to_not_found() {
        assert!(matches!(
            PromotionsServiceError::from(Error::RowNotFound),
            PromotionsServiceError::NotFound
        ));
    }

    #[test]
    fn participation_errors_keep_their_message() {
        let error = PromotionsServiceError::from(ParticipationError::AlreadyJoined);

        assert_eq!(error.to_string(), "already joined this promotion");
    }
}
