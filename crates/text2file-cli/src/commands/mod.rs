//! CLI command implementations

pub mod cleanup;
pub mod generate;
pub mod generate_set;
pub mod list;
pub mod validate;

mod reporting;
