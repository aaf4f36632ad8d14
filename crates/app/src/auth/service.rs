//! Auth service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::{
    auth::{
        ApiTokenMetadata, AuthServiceError, BearerToken, CurrentUser, IssuedApiToken,
        models::NewApiToken, openbao::OpenBaoClient, repository::PgAuthRepository,
    },
    domain::users::records::UserUuid,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
    openbao: OpenBaoClient,
}

impl PgAuthService {
    #[must_use]
    pub fn new(pool: PgPool, openbao: OpenBaoClient) -> Self {
        Self {
            repository: PgAuthRepository::new(pool),
            openbao,
        }
    }

    /// Issue a new API token for the given user.
    ///
    /// # Errors
    ///
    /// Returns an error if HMAC computation or database insertion fails, or
    /// [`AuthServiceError::UnknownUser`] if the user does not exist.
    pub async fn issue_api_token(
        &self,
        user: UserUuid,
        expires_at: Option<Timestamp>,
    ) -> Result<IssuedApiToken, AuthServiceError> {
        let token = BearerToken::generate();

        let verifier = self.openbao.hmac(&token.verifier_input(user)).await?;

        let metadata = self
            .repository
            .create_api_token(&NewApiToken {
                uuid: token.token_uuid(),
                user_uuid: user,
                version: token.version(),
                verifier,
                expires_at,
            })
            .await?;

        Ok(IssuedApiToken {
            token: token.expose(),
            metadata,
        })
    }

    /// List all tokens for the given user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_api_tokens(
        &self,
        user: UserUuid,
    ) -> Result<Vec<ApiTokenMetadata>, AuthServiceError> {
        Ok(self.repository.list_api_tokens(user).await?)
    }

    /// Revoke a token by UUID. Returns `true` if the token was active.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn revoke_api_token(&self, token_uuid: Uuid) -> Result<bool, AuthServiceError> {
        Ok(self
            .repository
            .revoke_api_token(token_uuid)
            .await?
            .is_some())
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(
        &self,
        bearer_token: &str,
    ) -> Result<CurrentUser, AuthServiceError> {
        let presented = bearer_token.parse::<BearerToken>().map_err(|error| {
            debug!(%error, "rejected malformed bearer token");
            AuthServiceError::NotFound
        })?;

        let stored = self
            .repository
            .find_active_api_token(presented.token_uuid(), presented.version())
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        let valid = self
            .openbao
            .verify(&presented.verifier_input(stored.user_uuid), &stored.verifier)
            .await?;

        if !valid {
            return Err(AuthServiceError::NotFound);
        }

        if let Err(error) = self.repository.touch_api_token(presented.token_uuid()).await {
            debug!(%error, "failed to record api token use");
        }

        Ok(CurrentUser {
            uuid: stored.user_uuid,
            role: stored.role,
        })
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a bearer token to the user it was issued to.
    async fn authenticate_bearer(&self, bearer_token: &str)
    -> Result<CurrentUser, AuthServiceError>;
}
