//! User Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use thiserror::Error;

use crate::uuids::TypedUuid;

/// User UUID
pub type UserUuid = TypedUuid<UserRecord>;

/// Platform role attached to every user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserRole {
    Creator,
    SalesAgent,
    Company,
    Freelancer,
    Client,
    Admin,
}

impl UserRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Creator => "creator",
            Self::SalesAgent => "sales_agent",
            Self::Company => "company",
            Self::Freelancer => "freelancer",
            Self::Client => "client",
            Self::Admin => "admin",
        }
    }

    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown user role: {0}")]
pub struct UnknownUserRole(pub String);

impl FromStr for UserRole {
    type Err = UnknownUserRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "creator" => Ok(Self::Creator),
            "sales_agent" => Ok(Self::SalesAgent),
            "company" => Ok(Self::Company),
            "freelancer" => Ok(Self::Freelancer),
            "client" => Ok(Self::Client),
            "admin" => Ok(Self::Admin),
            other => Err(UnknownUserRole(other.to_string())),
        }
    }
}

/// User Record
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub uuid: UserUuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
