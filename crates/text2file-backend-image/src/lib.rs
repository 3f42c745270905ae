//! Image backend for text2file.
//!
//! Raster formats (`png`, `jpg`, `bmp`, `gif`) render the content as text
//! with a built-in bitmap font; `svg` emits text elements. The
//! [`image_set`] module renders icon sets from a base image or a
//! placeholder.

pub mod canvas;
pub mod font;
pub mod image_set;
pub mod png;
pub mod raster;
pub mod svg;

use text2file_spec::{Format, GenerateError, GenerateOptions, Verdict};

pub use image_set::{check_set_options, load_base_image, render_icon, IconSource};

/// Re-exported so callers can hold decoded base images without naming the
/// `image` crate themselves.
pub use image::DynamicImage;

/// Produce the bytes of an image artifact showing `content`.
pub fn generate(
    format: Format,
    content: &str,
    options: &GenerateOptions,
) -> Result<Vec<u8>, GenerateError> {
    if format == Format::Svg {
        return svg::generate(content, options);
    }
    if !format.is_raster() {
        return Err(GenerateError::backend(format, "not handled by the image backend"));
    }
    let size = options.dimensions()?;
    let canvas =
        canvas::render_text_block(size, options.background, options.foreground, content);
    raster::encode(format, canvas)
}

/// Inspect the bytes of an image file.
pub fn validate(format: Format, bytes: &[u8]) -> Verdict {
    if format == Format::Svg {
        svg::validate(bytes)
    } else {
        raster::validate(format, bytes)
    }
}
