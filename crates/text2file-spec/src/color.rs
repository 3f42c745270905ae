//! 8-bit RGB colors parsed from hex codes or a small set of names.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GenerateError;

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

const NAMED: &[(&str, Rgb)] = &[
    ("white", Rgb::rgb(255, 255, 255)),
    ("black", Rgb::rgb(0, 0, 0)),
    ("red", Rgb::rgb(255, 0, 0)),
    ("green", Rgb::rgb(0, 128, 0)),
    ("blue", Rgb::rgb(0, 0, 255)),
    ("yellow", Rgb::rgb(255, 255, 0)),
    ("cyan", Rgb::rgb(0, 255, 255)),
    ("magenta", Rgb::rgb(255, 0, 255)),
    ("gray", Rgb::rgb(128, 128, 128)),
    ("grey", Rgb::rgb(128, 128, 128)),
    ("orange", Rgb::rgb(255, 165, 0)),
    ("purple", Rgb::rgb(128, 0, 128)),
];

impl Rgb {
    pub const WHITE: Rgb = Rgb::rgb(255, 255, 255);
    pub const BLACK: Rgb = Rgb::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Parse `#rgb`, `#rrggbb` (with or without `#`) or a color name.
    pub fn parse(value: &str) -> Result<Self, GenerateError> {
        let trimmed = value.trim();
        let lower = trimmed.to_ascii_lowercase();
        if let Some((_, color)) = NAMED.iter().find(|(name, _)| *name == lower) {
            return Ok(*color);
        }

        let hex = lower.strip_prefix('#').unwrap_or(&lower);
        let invalid = || GenerateError::InvalidOption(format!("invalid color '{}'", trimmed));
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match hex.len() {
            3 => {
                let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                Ok(Rgb::rgb(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Ok(Rgb::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            _ => Err(invalid()),
        }
    }
}

impl FromStr for Rgb {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgb::parse(s)
    }
}

impl TryFrom<String> for Rgb {
    type Error = GenerateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::parse(&value)
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_hex()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
