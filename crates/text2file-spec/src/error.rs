//! Error taxonomy shared by the registry, the generators and the drivers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::format::{Dependency, Format};
use crate::report::Fault;

/// Stable, serializable classification of a per-item failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// No capability is registered for the extension.
    UnsupportedFormat,
    /// The capability exists but its backing library is not compiled in.
    MissingDependency,
    /// A dimension, color or other option value is unusable.
    InvalidOption,
    /// Writing the artifact to disk failed.
    WriteFailure,
    /// The format library rejected the input or failed internally.
    BackendFailure,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::UnsupportedFormat => "unsupported_format",
            FailureKind::MissingDependency => "missing_dependency",
            FailureKind::InvalidOption => "invalid_option",
            FailureKind::WriteFailure => "write_failure",
            FailureKind::BackendFailure => "backend_failure",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure to resolve an extension to a usable handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityError {
    #[error("unsupported format: '{extension}' has no registered capability")]
    UnsupportedFormat { extension: String },

    #[error("'{extension}' needs the {dependency} capability which is not available; {hint}", hint = .dependency.install_hint())]
    MissingDependency {
        extension: String,
        dependency: Dependency,
    },
}

impl CapabilityError {
    pub fn unsupported(extension: impl Into<String>) -> Self {
        CapabilityError::UnsupportedFormat {
            extension: extension.into(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            CapabilityError::UnsupportedFormat { .. } => FailureKind::UnsupportedFormat,
            CapabilityError::MissingDependency { .. } => FailureKind::MissingDependency,
        }
    }
}

/// Typed failure of a single generator invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    /// An option value is malformed (bad color, bad sheet name, empty rows).
    #[error("invalid option: {0}")]
    InvalidOption(String),

    /// A width or height is zero, too large or not a number.
    #[error("invalid dimension: {0}")]
    InvalidDimension(String),

    /// Options that are individually fine but cannot be combined.
    #[error("unsupported option combination: {0}")]
    UnsupportedOptions(String),

    /// The format library failed.
    #[error("{format} backend failed: {message}")]
    Backend { format: Format, message: String },
}

impl GenerateError {
    pub fn backend(format: Format, message: impl fmt::Display) -> Self {
        GenerateError::Backend {
            format,
            message: message.to_string(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            GenerateError::InvalidOption(_)
            | GenerateError::InvalidDimension(_)
            | GenerateError::UnsupportedOptions(_) => FailureKind::InvalidOption,
            GenerateError::Backend { .. } => FailureKind::BackendFailure,
        }
    }
}

/// Malformed request, raised before any per-item work starts.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("no extensions requested")]
    EmptyExtensions,

    #[error("invalid prefix '{0}': must be non-empty and contain no path separators")]
    InvalidPrefix(String),

    #[error("output directory {} is not usable: {message}", .path.display())]
    OutputDir { path: PathBuf, message: String },

    #[error("{} is not a directory", .path.display())]
    NotADirectory { path: PathBuf },

    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid image-set config {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("image-set config {} defines no icons", .0.display())]
    NoEntries(PathBuf),

    #[error("cannot load base image {}: {message}", .path.display())]
    BaseImage { path: PathBuf, message: String },

    #[error(transparent)]
    Options(#[from] GenerateError),

    #[error(transparent)]
    Capability(#[from] CapabilityError),
}

/// Fault while validating a file. Malformed content is never a fault.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error(transparent)]
    Capability(#[from] CapabilityError),

    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is {size} bytes, over the {limit} byte inspection limit; left unchecked", .path.display())]
    TooLarge { path: PathBuf, size: u64, limit: u64 },
}

impl ValidateError {
    /// Report entry for a file that could not be inspected at all.
    ///
    /// Capability errors have no path of their own; `path` is used for them.
    pub fn into_fault(self, path: &Path) -> Fault {
        let message = match &self {
            ValidateError::Io { source, .. } => source.to_string(),
            other => other.to_string(),
        };
        let path = match self {
            ValidateError::Io { path, .. } | ValidateError::TooLarge { path, .. } => path,
            ValidateError::Capability(_) => path.to_path_buf(),
        };
        Fault { path, message }
    }
}
