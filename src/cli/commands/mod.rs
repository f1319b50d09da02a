//! CLI command implementations.

pub mod rank;
pub mod status;
pub mod validate;
