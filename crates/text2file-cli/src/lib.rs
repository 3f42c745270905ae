//! text2file CLI library.
//!
//! The binary is a thin shell over these modules:
//!
//! - [`registry`]: extension → generator/validator capabilities
//! - [`batch`]: one content payload, many extensions
//! - [`image_set`]: icon sets from a JSON document
//! - [`inspect`] and [`cleanup`]: validation of existing files
//! - [`commands`]: argument handling and console/JSON reports

pub mod batch;
pub mod cleanup;
pub mod commands;
pub mod dispatch;
pub mod image_set;
pub mod inspect;
pub mod logging;
pub mod registry;
pub mod walk;

pub use registry::Registry;
