//! Per-item results and aggregate reports.
//!
//! These are plain data: the drivers fill them in and the CLI renders them
//! either as colored text or as JSON.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{CapabilityError, FailureKind, GenerateError};

/// Why one item of a batch failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn write(err: &std::io::Error) -> Self {
        Self::new(FailureKind::WriteFailure, err.to_string())
    }
}

impl From<CapabilityError> for Failure {
    fn from(err: CapabilityError) -> Self {
        Self::new(err.kind(), err.to_string())
    }
}

impl From<GenerateError> for Failure {
    fn from(err: GenerateError) -> Self {
        Self::new(err.kind(), err.to_string())
    }
}

/// Outcome of generating one requested extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Absolute path of the artifact (or where it would have been written).
    pub path: PathBuf,
    /// Normalized extension token as requested.
    pub extension: String,
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Failure>,
    /// Size of the written artifact in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
    /// BLAKE3 hex digest of the written artifact.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

impl GenerationResult {
    pub fn success(path: PathBuf, extension: impl Into<String>, bytes: u64, hash: String) -> Self {
        Self {
            path,
            extension: extension.into(),
            succeeded: true,
            error: None,
            bytes: Some(bytes),
            hash: Some(hash),
        }
    }

    pub fn failure(path: PathBuf, extension: impl Into<String>, error: Failure) -> Self {
        Self {
            path,
            extension: extension.into(),
            succeeded: false,
            error: Some(error),
            bytes: None,
            hash: None,
        }
    }
}

/// Structural verdict of a backend validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The file is well-formed; `detail` summarizes what was found.
    Valid { detail: String },
    /// The file is malformed for its claimed format.
    Invalid { reason: String },
}

impl Verdict {
    pub fn valid(detail: impl Into<String>) -> Self {
        Verdict::Valid {
            detail: detail.into(),
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Verdict::Invalid {
            reason: reason.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid { .. })
    }
}

/// Outcome of validating one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub path: PathBuf,
    pub extension: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ValidationResult {
    pub fn from_verdict(path: PathBuf, extension: impl Into<String>, verdict: Verdict) -> Self {
        let extension = extension.into();
        match verdict {
            Verdict::Valid { detail } => Self {
                path,
                extension,
                valid: true,
                reason: None,
                detail: Some(detail),
            },
            Verdict::Invalid { reason } => Self {
                path,
                extension,
                valid: false,
                reason: Some(reason),
                detail: None,
            },
        }
    }
}

/// A path that could not be processed at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fault {
    pub path: PathBuf,
    pub message: String,
}

/// Aggregate of a validate run over a file or a tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub results: Vec<ValidationResult>,
    /// Files whose extension has no usable validator.
    pub skipped: Vec<PathBuf>,
    pub faults: Vec<Fault>,
}

impl ValidationReport {
    pub fn valid_count(&self) -> usize {
        self.results.iter().filter(|r| r.valid).count()
    }

    pub fn invalid_count(&self) -> usize {
        self.results.len() - self.valid_count()
    }

    /// True when nothing inspected was invalid and nothing faulted.
    pub fn all_valid(&self) -> bool {
        self.faults.is_empty() && self.results.iter().all(|r| r.valid)
    }
}

/// Aggregate of a cleanup walk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupReport {
    pub dry_run: bool,
    /// Every file that was validated, in walk order.
    pub inspected: Vec<ValidationResult>,
    /// Invalid files removed (or that would be removed in a dry run).
    pub removed: Vec<PathBuf>,
    /// Files left alone because their extension is unknown or unavailable.
    pub skipped: Vec<PathBuf>,
    /// Read faults and deletion failures; the walk continued past them.
    pub failures: Vec<Fault>,
}
