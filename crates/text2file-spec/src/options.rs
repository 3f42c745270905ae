//! Generator options.
//!
//! A single [`GenerateOptions`] value travels with every request; each
//! generator reads the fields relevant to its family and validates them
//! lazily, so a bad image width only fails the image items of a batch.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::color::Rgb;
use crate::error::GenerateError;

/// Largest accepted canvas edge, in pixels.
pub const MAX_DIMENSION: u32 = 8192;

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";
pub const DEFAULT_MEMBER_NAME: &str = "content.txt";

/// A validated pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// Build dimensions, rejecting zero and oversized edges.
    pub fn new(width: u32, height: u32) -> Result<Self, GenerateError> {
        if width == 0 || height == 0 {
            return Err(GenerateError::InvalidDimension(format!(
                "{}x{}: width and height must be positive",
                width, height
            )));
        }
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(GenerateError::InvalidDimension(format!(
                "{}x{}: edges are limited to {} pixels",
                width, height, MAX_DIMENSION
            )));
        }
        Ok(Self { width, height })
    }

    /// Parse a `WxH` size such as `16x16` (the separator is case-insensitive).
    pub fn parse(value: &str) -> Result<Self, GenerateError> {
        let trimmed = value.trim();
        let invalid = || {
            GenerateError::InvalidDimension(format!("'{}' is not of the form WxH", trimmed))
        };
        let (w, h) = trimmed
            .split_once(['x', 'X'])
            .ok_or_else(invalid)?;
        let width = w.trim().parse::<u32>().map_err(|_| invalid())?;
        let height = h.trim().parse::<u32>().map_err(|_| invalid())?;
        Dimensions::new(width, height)
    }
}

impl FromStr for Dimensions {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dimensions::parse(s)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// How a base image is fitted into an image-set entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeMode {
    /// Scale preserving aspect ratio and pad with the background color.
    #[default]
    Letterbox,
    /// Scale each axis independently to the exact entry size.
    Stretch,
}

impl FromStr for ResizeMode {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "letterbox" => Ok(ResizeMode::Letterbox),
            "stretch" => Ok(ResizeMode::Stretch),
            other => Err(GenerateError::InvalidOption(format!(
                "unknown resize mode '{}' (expected letterbox or stretch)",
                other
            ))),
        }
    }
}

impl fmt::Display for ResizeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResizeMode::Letterbox => f.write_str("letterbox"),
            ResizeMode::Stretch => f.write_str("stretch"),
        }
    }
}

/// Options shared by every generator in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Canvas width for image formats.
    pub width: Option<u32>,
    /// Canvas height for image formats.
    pub height: Option<u32>,
    pub background: Rgb,
    pub foreground: Rgb,
    /// Whether the first tabular row is a header that fixes the column count.
    pub has_header: bool,
    pub sheet_name: String,
    /// Name of the single member stored in archive outputs.
    pub member_name: String,
    /// Modification time stamped into archive members, seconds since the epoch.
    pub mtime: u64,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            background: Rgb::WHITE,
            foreground: Rgb::BLACK,
            has_header: true,
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            member_name: DEFAULT_MEMBER_NAME.to_string(),
            mtime: 0,
        }
    }
}

impl GenerateOptions {
    /// Canvas size, falling back to 800x600 for missing edges.
    pub fn dimensions(&self) -> Result<Dimensions, GenerateError> {
        Dimensions::new(
            self.width.unwrap_or(DEFAULT_WIDTH),
            self.height.unwrap_or(DEFAULT_HEIGHT),
        )
    }

    /// Worksheet name, checked against spreadsheet naming rules.
    pub fn checked_sheet_name(&self) -> Result<&str, GenerateError> {
        let name = self.sheet_name.as_str();
        let len = name.chars().count();
        if len == 0 || len > 31 {
            return Err(GenerateError::InvalidOption(format!(
                "sheet name '{}' must be 1 to 31 characters",
                name
            )));
        }
        if let Some(bad) = name.chars().find(|c| "[]:*?/\\".contains(*c)) {
            return Err(GenerateError::InvalidOption(format!(
                "sheet name '{}' contains forbidden character '{}'",
                name, bad
            )));
        }
        Ok(name)
    }

    /// Archive member name, which must be a plain relative path.
    pub fn checked_member_name(&self) -> Result<&str, GenerateError> {
        let name = self.member_name.as_str();
        let bad = name.is_empty()
            || name.starts_with('/')
            || name.contains('\\')
            || name.contains('\0')
            || name.ends_with('/')
            || name.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..");
        if bad {
            return Err(GenerateError::InvalidOption(format!(
                "member name '{}' must be a relative path without '.' or '..' segments",
                name
            )));
        }
        Ok(name)
    }
}
