//! Closed format table.
//!
//! Every extension text2file knows about maps to exactly one [`Format`]
//! variant. Raw tokens coming from the command line or from file names are
//! normalized once here and rejected at the boundary if unknown.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Broad family a format belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatFamily {
    /// Plain text, source code and structured text.
    Text,
    /// Delimited rows and spreadsheets.
    Tabular,
    /// Paginated or word-processing documents.
    Document,
    /// Raster and vector images.
    Image,
    /// Single-member containers.
    Archive,
}

impl FormatFamily {
    /// All families in display order.
    pub const ALL: [FormatFamily; 5] = [
        FormatFamily::Text,
        FormatFamily::Tabular,
        FormatFamily::Document,
        FormatFamily::Image,
        FormatFamily::Archive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormatFamily::Text => "text",
            FormatFamily::Tabular => "tabular",
            FormatFamily::Document => "document",
            FormatFamily::Image => "image",
            FormatFamily::Archive => "archive",
        }
    }
}

impl fmt::Display for FormatFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional capability backing one or more formats.
///
/// Each dependency corresponds to a cargo feature of the CLI crate; a build
/// without the feature still knows the formats but cannot produce them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dependency {
    Image,
    Archive,
    Pdf,
    Office,
}

impl Dependency {
    pub const ALL: [Dependency; 4] = [
        Dependency::Image,
        Dependency::Archive,
        Dependency::Pdf,
        Dependency::Office,
    ];

    /// Cargo feature that enables this dependency.
    pub fn feature(&self) -> &'static str {
        match self {
            Dependency::Image => "image",
            Dependency::Archive => "archive",
            Dependency::Pdf => "pdf",
            Dependency::Office => "office",
        }
    }

    /// Libraries pulled in by the feature.
    pub fn libraries(&self) -> &'static str {
        match self {
            Dependency::Image => "image, png",
            Dependency::Archive => "zip, tar, flate2",
            Dependency::Pdf => "lopdf",
            Dependency::Office => "zip, quick-xml",
        }
    }

    /// Install hint shown next to a `MissingDependency` error.
    pub fn install_hint(&self) -> String {
        format!(
            "rebuild text2file with `--features {}` ({})",
            self.feature(),
            self.libraries()
        )
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.feature())
    }
}

/// Every format text2file can generate and validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    Txt,
    Markdown,
    Html,
    Css,
    Js,
    Py,
    Sh,
    Json,
    Xml,
    Yaml,
    Toml,
    Ini,
    Csv,
    Tsv,
    Xlsx,
    Pdf,
    Docx,
    Png,
    Jpg,
    Bmp,
    Gif,
    Svg,
    Zip,
    Tar,
    TarGz,
    Gz,
}

impl Format {
    /// The static format table, in registration order.
    pub const ALL: [Format; 26] = [
        Format::Txt,
        Format::Markdown,
        Format::Html,
        Format::Css,
        Format::Js,
        Format::Py,
        Format::Sh,
        Format::Json,
        Format::Xml,
        Format::Yaml,
        Format::Toml,
        Format::Ini,
        Format::Csv,
        Format::Tsv,
        Format::Xlsx,
        Format::Pdf,
        Format::Docx,
        Format::Png,
        Format::Jpg,
        Format::Bmp,
        Format::Gif,
        Format::Svg,
        Format::Zip,
        Format::Tar,
        Format::TarGz,
        Format::Gz,
    ];

    /// Canonical extension, without a leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Txt => "txt",
            Format::Markdown => "md",
            Format::Html => "html",
            Format::Css => "css",
            Format::Js => "js",
            Format::Py => "py",
            Format::Sh => "sh",
            Format::Json => "json",
            Format::Xml => "xml",
            Format::Yaml => "yaml",
            Format::Toml => "toml",
            Format::Ini => "ini",
            Format::Csv => "csv",
            Format::Tsv => "tsv",
            Format::Xlsx => "xlsx",
            Format::Pdf => "pdf",
            Format::Docx => "docx",
            Format::Png => "png",
            Format::Jpg => "jpg",
            Format::Bmp => "bmp",
            Format::Gif => "gif",
            Format::Svg => "svg",
            Format::Zip => "zip",
            Format::Tar => "tar",
            Format::TarGz => "tar.gz",
            Format::Gz => "gz",
        }
    }

    /// Alternative tokens that resolve to this format.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Format::Txt => &["text"],
            Format::Markdown => &["markdown"],
            Format::Html => &["htm"],
            Format::Js => &["mjs"],
            Format::Sh => &["bash"],
            Format::Yaml => &["yml"],
            Format::Ini => &["cfg", "conf"],
            Format::Tsv => &["tab"],
            Format::Xlsx => &["excel"],
            Format::Jpg => &["jpeg"],
            Format::TarGz => &["tgz"],
            Format::Gz => &["gzip"],
            _ => &[],
        }
    }

    pub fn family(&self) -> FormatFamily {
        match self {
            Format::Txt
            | Format::Markdown
            | Format::Html
            | Format::Css
            | Format::Js
            | Format::Py
            | Format::Sh
            | Format::Json
            | Format::Xml
            | Format::Yaml
            | Format::Toml
            | Format::Ini => FormatFamily::Text,
            Format::Csv | Format::Tsv | Format::Xlsx => FormatFamily::Tabular,
            Format::Pdf | Format::Docx => FormatFamily::Document,
            Format::Png | Format::Jpg | Format::Bmp | Format::Gif | Format::Svg => {
                FormatFamily::Image
            }
            Format::Zip | Format::Tar | Format::TarGz | Format::Gz => FormatFamily::Archive,
        }
    }

    /// Optional dependency required to handle this format, if any.
    pub fn requires(&self) -> Option<Dependency> {
        match self.family() {
            FormatFamily::Text => None,
            FormatFamily::Tabular => match self {
                Format::Xlsx => Some(Dependency::Office),
                _ => None,
            },
            FormatFamily::Document => match self {
                Format::Pdf => Some(Dependency::Pdf),
                _ => Some(Dependency::Office),
            },
            FormatFamily::Image => Some(Dependency::Image),
            FormatFamily::Archive => Some(Dependency::Archive),
        }
    }

    /// Whether the format is a pixel raster (as opposed to svg).
    pub fn is_raster(&self) -> bool {
        matches!(self, Format::Png | Format::Jpg | Format::Bmp | Format::Gif)
    }

    /// Resolve a raw token (`".JPEG"`, `"tgz"`, `"csv"`) to a format.
    pub fn from_token(token: &str) -> Option<Format> {
        let normalized = normalize_extension(token);
        Format::ALL.iter().copied().find(|format| {
            format.extension() == normalized || format.aliases().contains(&normalized.as_str())
        })
    }

    /// Resolve the format a file name claims through its extension.
    ///
    /// Returns the normalized token together with the format so callers can
    /// report what the file actually said.
    pub fn from_path(path: &Path) -> Option<(String, Format)> {
        let token = extension_token(path)?;
        Format::from_token(&token).map(|format| (token, format))
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Normalize an extension token: trim, strip leading dots, lowercase.
pub fn normalize_extension(raw: &str) -> String {
    raw.trim().trim_start_matches('.').to_ascii_lowercase()
}

/// Extract the extension token of a path, treating `.tar.gz` as one token.
pub fn extension_token(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?.to_ascii_lowercase();
    if name.ends_with(".tar.gz") && name.len() > ".tar.gz".len() {
        return Some("tar.gz".to_string());
    }
    let ext = path.extension()?.to_str()?;
    if ext.is_empty() {
        return None;
    }
    Some(normalize_extension(ext))
}
