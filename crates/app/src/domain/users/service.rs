//! Users service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;

use crate::domain::users::{
    data::NewUser,
    errors::UsersServiceError,
    records::{UserRecord, UserUuid},
    repository::PgUsersRepository,
};

#[derive(Debug, Clone)]
pub struct PgUsersService {
    repository: PgUsersRepository,
}

impl PgUsersService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgUsersRepository::new(pool),
        }
    }
}

#[async_trait]
impl UsersService for PgUsersService {
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, UsersServiceError> {
        Ok(self.repository.create_user(user).await?)
    }

    async fn get_user(&self, user: UserUuid) -> Result<UserRecord, UsersServiceError> {
        Ok(self.repository.get_user(user).await?)
    }

    async fn find_users(&self, users: &[UserUuid]) -> Result<Vec<UserRecord>, UsersServiceError> {
        if users.is_empty() {
            return Ok(Vec::new());
        }

        Ok(self.repository.find_users(users).await?)
    }
}

#[automock]
#[async_trait]
pub trait UsersService: Send + Sync {
    /// Register a user in the directory.
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, UsersServiceError>;

    /// Fetch a single user.
    async fn get_user(&self, user: UserUuid) -> Result<UserRecord, UsersServiceError>;

    /// Resolve a batch of users. Unknown ids are skipped.
    async fn find_users(&self, users: &[UserUuid]) -> Result<Vec<UserRecord>, UsersServiceError>;
}
