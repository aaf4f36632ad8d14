//! Users
//!
//! The user directory the promotion core consults to attach roles to callers
//! and to render participant listings.

pub mod data;
pub mod errors;
pub mod records;
pub(crate) mod repository;
pub mod service;

pub use errors::UsersServiceError;
pub use service::*;
