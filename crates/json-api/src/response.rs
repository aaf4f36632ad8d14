//! Response envelope shared by every API endpoint.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

use rave_app::domain::promotions::data::Page;

/// `{ success, message?, data?, pagination? }`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiResponse<T: ToSchema + 'static> {
    /// Whether the request succeeded
    pub success: bool,

    /// Human-readable outcome
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Response payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Present on paginated listings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T: ToSchema + 'static> ApiResponse<T> {
    pub(crate) fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            pagination: None,
        }
    }

    pub(crate) fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::data(data)
        }
    }

    pub(crate) fn paginated(data: T, pagination: Pagination) -> Self {
        Self {
            pagination: Some(pagination),
            ..Self::data(data)
        }
    }
}

/// Page metadata for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct Pagination {
    /// Total matching records
    pub total: u64,

    /// 1-based page number
    pub page: u32,

    /// Page size
    pub limit: u32,

    /// Number of pages
    pub pages: u64,
}

impl<T> From<&Page<T>> for Pagination {
    fn from(page: &Page<T>) -> Self {
        Pagination {
            total: page.total,
            page: page.page,
            limit: page.limit,
            pages: page.pages(),
        }
    }
}

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ErrorResponse {
    /// Always `false`
    pub success: bool,

    /// What went wrong
    pub message: String,
}

impl ErrorResponse {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
