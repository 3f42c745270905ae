//! Validation engine behind the `validate` command and cleanup.

use std::fs;
use std::path::Path;
use text2file_spec::{RequestError, ValidateError, ValidationReport, ValidationResult};
use tracing::debug;

use crate::registry::Registry;
use crate::walk;

/// Files above this size are not read; they are reported as faults and
/// never judged invalid.
pub const MAX_VALIDATE_BYTES: u64 = 256 * 1024 * 1024;

/// Validate one file against the format its extension claims.
///
/// Malformed content is an `Ok` result with `valid == false`; only a missing
/// capability, an I/O failure or an oversize file is an error.
pub fn validate_path(registry: &Registry, path: &Path) -> Result<ValidationResult, ValidateError> {
    validate_path_within(registry, path, MAX_VALIDATE_BYTES)
}

/// [`validate_path`] with an explicit size limit in bytes.
pub fn validate_path_within(
    registry: &Registry,
    path: &Path,
    max_bytes: u64,
) -> Result<ValidationResult, ValidateError> {
    let (extension, resolved) = registry.validator_for_path(path)?;
    let io_error = |source| ValidateError::Io {
        path: path.to_path_buf(),
        source,
    };

    let metadata = fs::metadata(path).map_err(io_error)?;
    if metadata.len() > max_bytes {
        return Err(ValidateError::TooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            limit: max_bytes,
        });
    }
    let bytes = fs::read(path).map_err(io_error)?;
    let verdict = (resolved.handler)(resolved.format, &bytes);

    debug!(path = %path.display(), valid = verdict.is_valid(), "validated file");
    Ok(ValidationResult::from_verdict(
        path.to_path_buf(),
        extension,
        verdict,
    ))
}

/// Validate a single file or every known file in a directory.
///
/// For a file, an unknown extension is an error. In a directory such files
/// are listed as skipped.
pub fn validate_tree(
    registry: &Registry,
    path: &Path,
    recursive: bool,
) -> Result<ValidationReport, RequestError> {
    let metadata = fs::metadata(path).map_err(|source| RequestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut report = ValidationReport::default();

    if !metadata.is_dir() {
        match validate_path(registry, path) {
            Ok(result) => report.results.push(result),
            Err(ValidateError::Capability(err)) => return Err(err.into()),
            Err(err) => report.faults.push(err.into_fault(path)),
        }
        return Ok(report);
    }

    for entry in walk::regular_files(path, recursive) {
        let file = match entry {
            Ok(file) => file,
            Err(fault) => {
                report.faults.push(fault);
                continue;
            }
        };
        match validate_path(registry, &file) {
            Ok(result) => report.results.push(result),
            Err(ValidateError::Capability(err)) => {
                debug!(path = %file.display(), reason = %err, "skipping file");
                report.skipped.push(file);
            }
            Err(err) => report.faults.push(err.into_fault(&file)),
        }
    }
    Ok(report)
}
