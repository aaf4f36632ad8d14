//! Promotion Handlers

pub(crate) mod active;
pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod join;
pub(crate) mod mine;
pub(crate) mod participants;
pub(crate) mod progress;
pub(crate) mod update;
