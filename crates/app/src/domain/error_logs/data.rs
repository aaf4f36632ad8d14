//! Error Log Data

use uuid::Uuid;

use crate::domain::users::records::UserUuid;

/// A failed request, as captured by the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewErrorLog {
    pub method: String,
    pub path: String,
    pub status: u16,
    pub message: String,
    pub user_uuid: Option<UserUuid>,
    pub request_id: Option<Uuid>,
}
