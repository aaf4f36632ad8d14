//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use rave_app::auth::CurrentUser;

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_current_user(&mut self, user: CurrentUser);

    /// The authenticated caller, if the auth middleware ran and succeeded.
    fn current_user(&self) -> Option<CurrentUser>;

    fn current_user_or_401(&self) -> Result<CurrentUser, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_current_user(&mut self, user: CurrentUser) {
        self.inject(user);
    }

    fn current_user(&self) -> Option<CurrentUser> {
        self.obtain::<CurrentUser>().ok().copied()
    }

    fn current_user_or_401(&self) -> Result<CurrentUser, StatusError> {
        self.current_user()
            .ok_or_else(|| StatusError::unauthorized().brief("Authentication required"))
    }
}

#[cfg(test)]
mod tests {
    use rave_app::domain::users::records::{UserRole, UserUuid};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn current_user_round_trips_through_the_depot() -> TestResult {
        let user = CurrentUser {
            uuid: UserUuid::new(),
            role: UserRole::Creator,
        };

        let mut depot = Depot::new();

        assert!(depot.current_user().is_none(), "depot starts empty");

        depot.insert_current_user(user);

        assert_eq!(depot.current_user_or_401()?, user);

        Ok(())
    }

    #[test]
    fn missing_current_user_is_unauthorized() {
        let depot = Depot::new();

        let error = depot.current_user_or_401().err();

        assert_eq!(
            error.map(|error| error.code),
            Some(salvo::http::StatusCode::UNAUTHORIZED)
        );
    }
}
