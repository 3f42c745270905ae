//! Batch generation driver.
//!
//! One request produces one artifact per requested extension. Request-level
//! problems abort before anything is written; per-extension problems are
//! recorded in that extension's result and the batch moves on.

use chrono::{DateTime, Local};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use text2file_spec::{
    normalize_extension, Failure, FailureKind, Format, GenerateOptions, GenerationRequest,
    GenerationResult, RequestError,
};
use tracing::{info, warn};

use crate::dispatch::{write_output_bytes, WriteMode};
use crate::registry::Registry;

/// Microsecond resolution keeps separate invocations apart.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S_%6f";

/// Generate every requested extension, in request order.
pub fn generate_batch(
    registry: &Registry,
    request: &GenerationRequest,
) -> Result<Vec<GenerationResult>, RequestError> {
    generate_batch_at(registry, request, Local::now())
}

/// [`generate_batch`] with an explicit batch time.
pub fn generate_batch_at(
    registry: &Registry,
    request: &GenerationRequest,
    now: DateTime<Local>,
) -> Result<Vec<GenerationResult>, RequestError> {
    if request.extensions.is_empty() {
        return Err(RequestError::EmptyExtensions);
    }
    check_prefix(&request.prefix)?;
    let output_dir = prepare_output_dir(&request.output_dir)?;

    let stamp = now.format(TIMESTAMP_FORMAT).to_string();
    let options = GenerateOptions {
        mtime: u64::try_from(now.timestamp()).unwrap_or(0),
        ..request.options.clone()
    };

    let mut occurrences: HashMap<String, usize> = HashMap::new();
    let results = request
        .extensions
        .iter()
        .map(|raw| {
            let extension = normalize_extension(raw);
            let nth = occurrences.entry(extension.clone()).or_insert(0);
            *nth += 1;
            let path = output_dir.join(output_file_name(&request.prefix, &stamp, &extension, *nth));
            generate_one(registry, &request.content, &extension, path, &options)
        })
        .collect();
    Ok(results)
}

/// `{prefix}_{stamp}.{ext}`, with `_{n}` before the extension for the nth
/// repeat of the same extension.
pub fn output_file_name(prefix: &str, stamp: &str, extension: &str, nth: usize) -> String {
    if nth > 1 {
        format!("{}_{}_{}.{}", prefix, stamp, nth, extension)
    } else {
        format!("{}_{}.{}", prefix, stamp, extension)
    }
}

fn check_prefix(prefix: &str) -> Result<(), RequestError> {
    let bad = prefix.is_empty()
        || prefix == "."
        || prefix == ".."
        || prefix.contains(['/', '\\', '\0'])
        || prefix.contains(std::path::MAIN_SEPARATOR);
    if bad {
        return Err(RequestError::InvalidPrefix(prefix.to_string()));
    }
    Ok(())
}

/// Create the output directory if needed, check it accepts new files and
/// return its absolute path.
pub(crate) fn prepare_output_dir(dir: &Path) -> Result<PathBuf, RequestError> {
    let unusable = |message: String| RequestError::OutputDir {
        path: dir.to_path_buf(),
        message,
    };
    if dir.exists() && !dir.is_dir() {
        return Err(RequestError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }
    fs::create_dir_all(dir).map_err(|e| unusable(e.to_string()))?;
    tempfile::NamedTempFile::new_in(dir).map_err(|e| unusable(format!("not writable: {}", e)))?;
    dir.canonicalize().map_err(|e| unusable(e.to_string()))
}

fn generate_one(
    registry: &Registry,
    content: &str,
    extension: &str,
    path: PathBuf,
    options: &GenerateOptions,
) -> GenerationResult {
    let outcome = registry
        .resolve_generator(extension)
        .map_err(Failure::from)
        .and_then(|resolved| {
            let bytes = (resolved.handler)(resolved.format, content, options)?;
            write_output_bytes(&path, &bytes, WriteMode::CreateNew, resolved.format == Format::Sh)
                .map_err(|err| write_failure(&path, &err))?;
            Ok(bytes)
        });

    match outcome {
        Ok(bytes) => {
            let hash = blake3::hash(&bytes).to_hex().to_string();
            info!(path = %path.display(), bytes = bytes.len(), "generated file");
            GenerationResult::success(path, extension, bytes.len() as u64, hash)
        }
        Err(failure) => {
            warn!(extension, kind = %failure.kind, "{}", failure.message);
            GenerationResult::failure(path, extension, failure)
        }
    }
}

fn write_failure(path: &Path, err: &io::Error) -> Failure {
    if err.kind() == io::ErrorKind::AlreadyExists {
        Failure::new(
            FailureKind::WriteFailure,
            format!("{} already exists; refusing to overwrite", path.display()),
        )
    } else {
        Failure::write(err)
    }
}
