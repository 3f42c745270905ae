//! text2file shared model.
//!
//! This crate holds everything the backends and the CLI agree on without
//! touching the filesystem:
//!
//! - [`Format`], [`FormatFamily`] and [`Dependency`]: the closed format table
//! - [`GenerateOptions`], [`Dimensions`], [`Rgb`]: generator inputs
//! - [`ImageSetSpec`]: parsed image-set documents
//! - result and report types, and the error taxonomy

pub mod color;
pub mod error;
pub mod format;
pub mod image_set;
pub mod options;
pub mod report;
pub mod request;
pub mod text;

pub use color::Rgb;
pub use error::{
    CapabilityError, FailureKind, GenerateError, RequestError, ValidateError,
};
pub use format::{extension_token, normalize_extension, Dependency, Format, FormatFamily};
pub use image_set::{IconTarget, ImageSetEntry, ImageSetSpec};
pub use options::{Dimensions, GenerateOptions, ResizeMode, MAX_DIMENSION};
pub use report::{
    CleanupReport, Failure, Fault, GenerationResult, ValidationReport, ValidationResult, Verdict,
};
pub use request::{GenerationRequest, DEFAULT_PREFIX};
