//! Text backend for text2file.
//!
//! Handles every format that needs no optional library:
//!
//! - plain text and source code (`txt`, `md`, `html`, `css`, `js`, `py`, `sh`)
//! - structured text (`json`, `xml`, `yaml`)
//! - configuration files (`toml`, `ini`)
//! - delimited tables (`csv`, `tsv`)
//!
//! The [`xml`] and [`tabular`] helpers are public so the document backend
//! can reuse them for Office Open XML packages.

pub mod config;
pub mod plain;
pub mod structured;
pub mod tabular;
pub mod xml;

use text2file_spec::text::reject_control_chars;
use text2file_spec::{Format, FormatFamily, GenerateError, GenerateOptions, Verdict};

/// Produce the bytes of a text-family artifact.
///
/// Formats written verbatim refuse control characters; json, yaml and the
/// configuration formats escape them when serializing instead.
pub fn generate(
    format: Format,
    content: &str,
    options: &GenerateOptions,
) -> Result<Vec<u8>, GenerateError> {
    if !matches!(format, Format::Json | Format::Yaml | Format::Toml | Format::Ini) {
        reject_control_chars(content)?;
    }
    match format {
        Format::Json | Format::Xml | Format::Yaml => structured::generate(format, content),
        Format::Toml | Format::Ini => config::generate(format, content),
        Format::Csv | Format::Tsv => tabular::generate(format, content, options),
        f if f.family() == FormatFamily::Text => Ok(plain::generate(content)),
        other => Err(GenerateError::backend(other, "not handled by the text backend")),
    }
}

/// Inspect the bytes of a text-family file.
pub fn validate(format: Format, bytes: &[u8]) -> Verdict {
    match format {
        Format::Json | Format::Xml | Format::Yaml => structured::validate(format, bytes),
        Format::Toml | Format::Ini => config::validate(format, bytes),
        Format::Csv | Format::Tsv => tabular::validate(format, bytes),
        f if f.family() == FormatFamily::Text => plain::validate(bytes),
        other => Verdict::invalid(format!("{} is not handled by the text backend", other)),
    }
}
