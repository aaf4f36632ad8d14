//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::{AuthService, OpenBaoClient, PgAuthService},
    database::{self, Db},
    domain::{
        error_logs::{ErrorLogService, PgErrorLogService},
        promotions::{PgPromotionsService, PromotionsService},
        users::{PgUsersService, UsersService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

/// The services the HTTP layer depends on.
#[derive(Clone)]
pub struct AppContext {
    pub promotions: Arc<dyn PromotionsService>,
    pub users: Arc<dyn UsersService>,
    pub auth: Arc<dyn AuthService>,
    pub error_logs: Arc<dyn ErrorLogService>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(
        url: &str,
        openbao: OpenBaoClient,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        let users: Arc<dyn UsersService> = Arc::new(PgUsersService::new(pool.clone()));

        Ok(Self {
            promotions: Arc::new(PgPromotionsService::new(
                Db::new(pool.clone()),
                Arc::clone(&users),
            )),
            users,
            auth: Arc::new(PgAuthService::new(pool.clone(), openbao)),
            error_logs: Arc::new(PgErrorLogService::new(pool)),
        })
    }
}
