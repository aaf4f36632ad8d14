//! Promotion Errors

use std::error::Error as _;

use salvo::http::StatusError;
use tracing::error;

use rave_app::domain::promotions::{ParticipationError, PromotionsServiceError};

pub(crate) fn into_status_error(error: PromotionsServiceError) -> StatusError {
    match error {
        PromotionsServiceError::Validation(source) => {
            StatusError::bad_request().brief(source.to_string())
        }
        PromotionsServiceError::Participation(source) => {
            StatusError::bad_request().brief(source.to_string())
        }
        PromotionsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid promotion payload")
        }
        PromotionsServiceError::NotFound => StatusError::not_found().brief("Promotion not found"),
        error @ (PromotionsServiceError::AlreadyExists
        | PromotionsServiceError::MissingParticipant { .. }
        | PromotionsServiceError::Users(_)
        | PromotionsServiceError::Sql(_)) => {
            let detail = describe(&error);

            error!("failed to process promotion: {detail}");

            StatusError::internal_server_error()
                .brief("failed to process promotion")
                .detail(detail)
        }
    }
}

/// Metrics label for the outcome of a participation operation.
pub(crate) fn outcome<T>(result: &Result<T, PromotionsServiceError>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(PromotionsServiceError::NotFound) => "not_found",
        Err(PromotionsServiceError::Participation(error)) => match error {
            ParticipationError::InvalidIncrement => "invalid_increment",
            ParticipationError::NotActive => "not_active",
            ParticipationError::NotStarted => "not_started",
            ParticipationError::Ended => "ended",
            ParticipationError::AlreadyJoined => "already_joined",
            ParticipationError::CapacityExceeded => "capacity_exceeded",
            ParticipationError::NotParticipating => "not_participating",
        },
        Err(_) => "error",
    }
}

/// `error: cause: cause` down the source chain.
fn describe(error: &PromotionsServiceError) -> String {
    let mut described = error.to_string();
    let mut source = error.source();

    while let Some(cause) = source {
        described.push_str(": ");
        described.push_str(&cause.to_string());

        source = cause.source();
    }

    described
}
