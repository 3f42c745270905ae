//! Batch generation request.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::options::GenerateOptions;

pub const DEFAULT_PREFIX: &str = "generated";

/// One content payload fanned out to several extensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub content: String,
    /// Requested extension tokens, in order. Duplicates are processed
    /// independently.
    pub extensions: Vec<String>,
    /// Created if absent.
    pub output_dir: PathBuf,
    /// Filename stem placed before the timestamp.
    pub prefix: String,
    #[serde(default)]
    pub options: GenerateOptions,
}

impl GenerationRequest {
    pub fn new<I, S>(content: impl Into<String>, extensions: I, output_dir: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            content: content.into(),
            extensions: extensions.into_iter().map(Into::into).collect(),
            output_dir: output_dir.into(),
            prefix: DEFAULT_PREFIX.to_string(),
            options: GenerateOptions::default(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_options(mut self, options: GenerateOptions) -> Self {
        self.options = options;
        self
    }
}
