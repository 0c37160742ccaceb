//! CLI command implementations

pub(crate) mod common;
pub(crate) mod order;
pub(crate) mod plan;
pub(crate) mod validate;
