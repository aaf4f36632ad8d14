//! Auth data models.

use jiff::Timestamp;
use uuid::Uuid;

use crate::{
    auth::ApiTokenVersion,
    domain::users::records::{UserRole, UserUuid},
};

/// The caller behind a verified bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub uuid: UserUuid,
    pub role: UserRole,
}

impl CurrentUser {
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// API token data used during bearer authentication.
#[derive(Debug, Clone)]
pub(crate) struct ActiveApiToken {
    pub user_uuid: UserUuid,

    /// Role of the owning user at lookup time.
    pub role: UserRole,

    /// OpenBao HMAC verifier for the token secret material.
    pub verifier: String,
}

/// API token metadata persisted in storage.
#[derive(Debug, Clone)]
pub struct ApiTokenMetadata {
    pub uuid: Uuid,
    pub user_uuid: UserUuid,
    pub version: ApiTokenVersion,
    pub created_at: Timestamp,
    pub last_used_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
    pub revoked_at: Option<Timestamp>,
}

/// New API token persistence payload.
#[derive(Debug, Clone)]
pub(crate) struct NewApiToken {
    pub uuid: Uuid,
    pub user_uuid: UserUuid,
    pub version: ApiTokenVersion,
    pub verifier: String,
    pub expires_at: Option<Timestamp>,
}

/// API token issuance result with one-time raw token.
#[derive(Debug, Clone)]
pub struct IssuedApiToken {
    pub token: String,
    pub metadata: ApiTokenMetadata,
}
