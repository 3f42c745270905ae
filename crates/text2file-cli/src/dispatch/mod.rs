//! Backend dispatch module
//!
//! Maps each optional dependency to the backend crate that implements it and
//! owns the atomic write of generated bytes.

mod archive;
mod document;
mod image;
mod text;

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use text2file_spec::{Dependency, Format, GenerateError, GenerateOptions, Verdict};

/// Generator signature shared by every backend.
pub type GenerateFn = fn(Format, &str, &GenerateOptions) -> Result<Vec<u8>, GenerateError>;

/// Validator signature shared by every backend.
pub type ValidateFn = fn(Format, &[u8]) -> Verdict;

/// The pair of entry points one backend crate exposes.
#[derive(Debug, Clone, Copy)]
pub struct BackendHandlers {
    pub generate: GenerateFn,
    pub validate: ValidateFn,
}

/// Whether the backend for `dependency` is compiled into this binary.
pub fn probe(dependency: Dependency) -> bool {
    backend_for(Some(dependency)).is_some()
}

/// Backend handling formats with the given requirement, if compiled in.
pub fn backend_for(requires: Option<Dependency>) -> Option<BackendHandlers> {
    match requires {
        None => Some(text::HANDLERS),
        Some(Dependency::Image) => image::handlers(),
        Some(Dependency::Archive) => archive::handlers(),
        Some(dependency @ (Dependency::Pdf | Dependency::Office)) => document::handlers(dependency),
    }
}

/// How [`write_output_bytes`] treats an existing file at the target path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Fail with `AlreadyExists` rather than replace anything.
    CreateNew,
    /// Atomically replace whatever is there.
    Overwrite,
}

/// Write `bytes` to `path` through a temporary file in the same directory,
/// so readers never observe a partially written artifact.
///
/// The parent directory must already exist.
pub fn write_output_bytes(
    path: &Path,
    bytes: &[u8],
    mode: WriteMode,
    executable: bool,
) -> io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = tempfile::Builder::new()
        .prefix(".t2f-")
        .tempfile_in(parent)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;
    set_mode(temp.path(), executable)?;

    match mode {
        WriteMode::CreateNew => temp.persist_noclobber(path).map_err(|e| e.error)?,
        WriteMode::Overwrite => temp.persist(path).map_err(|e| e.error)?,
    };
    Ok(())
}

#[cfg(unix)]
fn set_mode(path: &Path, executable: bool) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mode = if executable { 0o755 } else { 0o644 };
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(path: &Path, _executable: bool) -> io::Result<()> {
    fs::metadata(path).map(|_| ())
}
