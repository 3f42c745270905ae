//! Test harness utilities for driving generation and validation.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use text2file_cli::batch::generate_batch;
use text2file_cli::inspect::validate_path;
use text2file_cli::Registry;
use text2file_spec::{Format, GenerateOptions, GenerationRequest, GenerationResult, ValidationResult};

/// A temporary working directory plus the built-in registry.
pub struct TestHarness {
    /// Working directory for test outputs.
    pub work_dir: TempDir,
    pub registry: Registry,
}

impl TestHarness {
    /// Create a new test harness.
    pub fn new() -> Self {
        Self {
            work_dir: TempDir::new().expect("Failed to create work dir"),
            registry: Registry::builtin(),
        }
    }

    /// Get the working directory path.
    pub fn path(&self) -> &Path {
        self.work_dir.path()
    }

    /// Write a file relative to the working directory, creating parents.
    pub fn write(&self, rel_path: &str, bytes: impl AsRef<[u8]>) -> PathBuf {
        let path = self.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&path, bytes).expect("Failed to write file");
        path
    }

    /// Generate `content` for every extension into the working directory.
    pub fn generate(&self, content: &str, extensions: &[&str]) -> Vec<GenerationResult> {
        self.generate_with(content, extensions, GenerateOptions::default())
    }

    /// Like [`TestHarness::generate`] with explicit options.
    pub fn generate_with(
        &self,
        content: &str,
        extensions: &[&str],
        options: GenerateOptions,
    ) -> Vec<GenerationResult> {
        let request = GenerationRequest::new(content, extensions.iter().copied(), self.path())
            .with_options(options);
        generate_batch(&self.registry, &request).expect("Batch request was rejected")
    }

    /// Validate one file through the registry.
    pub fn validate(&self, path: &Path) -> ValidationResult {
        validate_path(&self.registry, path).expect("Validation could not run")
    }

    /// Sorted file names in the working directory (top level only).
    pub fn file_names(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.path())
            .expect("Failed to list work dir")
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Formats whose backend is compiled into this build.
pub fn available_formats(registry: &Registry) -> Vec<Format> {
    Format::ALL
        .iter()
        .copied()
        .filter(|format| registry.resolve_generator(format.extension()).is_ok())
        .collect()
}
