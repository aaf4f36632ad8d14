//! Authentication and role gates

pub(crate) mod middleware;
