//! Document backend for text2file.
//!
//! `pdf` output is built with lopdf (feature `pdf`); `xlsx` and `docx`
//! packages are written with the zip crate (feature `office`). A format
//! whose feature is off reports a backend failure, though the CLI registry
//! never routes to it in that case.

#[cfg(feature = "office")]
pub mod office;
#[cfg(feature = "pdf")]
pub mod pdf;

use text2file_spec::{Format, GenerateError, GenerateOptions, Verdict};

/// Produce the bytes of a document artifact.
#[cfg_attr(not(feature = "office"), allow(unused_variables))]
pub fn generate(
    format: Format,
    content: &str,
    options: &GenerateOptions,
) -> Result<Vec<u8>, GenerateError> {
    match format {
        #[cfg(feature = "pdf")]
        Format::Pdf => pdf::generate(content),
        #[cfg(feature = "office")]
        Format::Xlsx => office::generate_xlsx(content, options),
        #[cfg(feature = "office")]
        Format::Docx => office::generate_docx(content),
        other => Err(GenerateError::backend(
            other,
            "not handled by this build of the document backend",
        )),
    }
}

/// Inspect the bytes of a document file.
#[cfg_attr(not(any(feature = "pdf", feature = "office")), allow(unused_variables))]
pub fn validate(format: Format, bytes: &[u8]) -> Verdict {
    match format {
        #[cfg(feature = "pdf")]
        Format::Pdf => pdf::validate(bytes),
        #[cfg(feature = "office")]
        Format::Xlsx | Format::Docx => office::validate(format, bytes),
        other => Verdict::invalid(format!(
            "{} is not handled by this build of the document backend",
            other
        )),
    }
}

#[cfg(all(test, feature = "pdf", feature = "office"))]
mod tests {
    use super::*;

    #[test]
    fn every_document_format_round_trips() {
        let options = GenerateOptions::default();
        for format in [Format::Pdf, Format::Xlsx, Format::Docx] {
            let bytes = generate(format, "a,b\n1,2", &options).unwrap();
            assert!(validate(format, &bytes).is_valid(), "{format}");
        }
    }

    #[test]
    fn cross_format_bytes_are_invalid() {
        let options = GenerateOptions::default();
        let pdf = generate(Format::Pdf, "x", &options).unwrap();
        assert!(!validate(Format::Docx, &pdf).is_valid());
        let docx = generate(Format::Docx, "x", &options).unwrap();
        assert!(!validate(Format::Pdf, &docx).is_valid());
        assert!(!validate(Format::Xlsx, &docx).is_valid());
    }
}
