//! Promotions
//!
//! A promotion owns its participant list. Every change to that list happens
//! inside a transaction holding the promotion's row lock.

pub mod data;
mod errors;
pub mod participation;
pub mod records;
mod repository;
pub mod service;

pub use errors::{MissingFields, ParticipationError, PromotionValidationError, PromotionsServiceError};
pub use service::*;
