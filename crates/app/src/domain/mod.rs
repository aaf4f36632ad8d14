//! Domain

pub mod error_logs;
pub mod promotions;
pub mod users;
