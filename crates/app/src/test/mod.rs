//! Test support for service-level tests.

mod db;
pub(crate) mod helpers;

pub(crate) use context::TestContext;
