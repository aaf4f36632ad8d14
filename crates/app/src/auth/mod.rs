//! Authentication
//!
//! Bearer API tokens are issued per user. Only an OpenBao Transit HMAC of the
//! token material is stored.

mod errors;
mod models;
pub mod openbao;
mod repository;
mod service;
mod token;

pub use errors::*;
pub use models::*;
pub use openbao::{OpenBaoClient, OpenBaoConfig, OpenBaoError};
pub use repository::PgAuthRepository;
pub use service::*;
pub use token::*;
