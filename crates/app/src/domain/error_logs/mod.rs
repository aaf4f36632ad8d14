//! Error Logs
//!
//! Persistent record of failed API requests.

pub mod data;
pub mod errors;
pub(crate) mod repository;
pub mod service;

pub use errors::ErrorLogServiceError;
pub use service::*;
