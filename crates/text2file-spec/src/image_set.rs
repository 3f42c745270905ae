//! Image-set configuration documents.
//!
//! ```json
//! {"icons": [{"src": "icons/a.png", "sizes": "16x16"}, ...]}
//! ```
//!
//! The document as a whole must be valid JSON with an `icons` array. Each
//! entry is then checked on its own so one malformed entry never hides the
//! others.

use serde_json::Value;
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use crate::error::{CapabilityError, GenerateError};
use crate::format::{extension_token, Format};
use crate::options::Dimensions;
use crate::report::Failure;

/// A fully checked image-set entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconTarget {
    /// Output path relative to the output directory.
    pub path: PathBuf,
    pub format: Format,
    pub size: Dimensions,
}

/// One entry of the `icons` array, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSetEntry {
    pub index: usize,
    /// The `src` value as written, or a placeholder when it was missing.
    pub src: String,
    pub target: Result<IconTarget, Failure>,
}

/// Parsed image-set document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSetSpec {
    pub entries: Vec<ImageSetEntry>,
}

impl ImageSetSpec {
    /// Parse a configuration document.
    ///
    /// Errors are document-level only (not JSON, no `icons` array); entry
    /// problems are reported through [`ImageSetEntry::target`].
    pub fn from_json_str(json: &str) -> Result<Self, String> {
        let root: Value = serde_json::from_str(json).map_err(|e| e.to_string())?;
        let icons = root
            .get("icons")
            .ok_or_else(|| "missing 'icons' array".to_string())?
            .as_array()
            .ok_or_else(|| "'icons' must be an array".to_string())?;

        let mut seen = BTreeSet::new();
        let entries = icons
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                let src = raw
                    .get("src")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("<entry {}>", index));
                let target = parse_entry(raw).and_then(|target| {
                    if seen.insert(target.path.clone()) {
                        Ok(target)
                    } else {
                        Err(Failure::from(GenerateError::InvalidOption(format!(
                            "duplicate output path '{}'",
                            target.path.display()
                        ))))
                    }
                });
                ImageSetEntry { index, src, target }
            })
            .collect();

        Ok(Self { entries })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_entry(raw: &Value) -> Result<IconTarget, Failure> {
    let src = raw.get("src").and_then(Value::as_str).ok_or_else(|| {
        Failure::from(GenerateError::InvalidOption(
            "entry needs a string 'src'".to_string(),
        ))
    })?;
    let sizes = raw.get("sizes").and_then(Value::as_str).ok_or_else(|| {
        Failure::from(GenerateError::InvalidDimension(
            "entry needs a string 'sizes' of the form WxH".to_string(),
        ))
    })?;

    let path = safe_relative_path(src)?;
    let size = Dimensions::parse(sizes)?;

    let token = extension_token(&path).unwrap_or_default();
    let format = Format::from_token(&token)
        .filter(Format::is_raster)
        .ok_or_else(|| {
            Failure::from(CapabilityError::unsupported(if token.is_empty() {
                src.to_string()
            } else {
                token.clone()
            }))
        })?;

    Ok(IconTarget { path, format, size })
}

fn safe_relative_path(src: &str) -> Result<PathBuf, Failure> {
    let unsafe_path = || {
        Failure::from(GenerateError::InvalidOption(format!(
            "'{}' must be a relative path inside the output directory",
            src
        )))
    };
    if src.trim().is_empty() {
        return Err(unsafe_path());
    }
    let path = Path::new(src);
    let mut clean = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(unsafe_path())
            }
        }
    }
    if clean.as_os_str().is_empty() {
        return Err(unsafe_path());
    }
    Ok(clean)
}
