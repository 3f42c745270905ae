//! Image-set entry rendering.
//!
//! Every entry of an image set is drawn from the same source: either a base
//! image fitted to the entry size, or a placeholder with a centered caption.

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageReader, RgbaImage};
use std::path::Path;
use text2file_spec::{GenerateError, IconTarget, ResizeMode, Rgb};

use crate::canvas::render_caption;
use crate::raster;

/// Where entry pixels come from.
#[derive(Debug, Clone, Copy)]
pub enum IconSource<'a> {
    /// Solid background with a caption; `None` captions the entry size.
    Placeholder {
        background: Rgb,
        foreground: Rgb,
        caption: Option<&'a str>,
    },
    /// A decoded base image resized per `mode`, padded with `background`.
    Base {
        image: &'a DynamicImage,
        mode: ResizeMode,
        background: Rgb,
    },
}

/// Reject option combinations that cannot apply to the chosen source.
pub fn check_set_options(
    has_base: bool,
    text: Option<&str>,
    resize: Option<ResizeMode>,
) -> Result<(), GenerateError> {
    if has_base && text.is_some() {
        return Err(GenerateError::UnsupportedOptions(
            "a caption (-t) only applies to placeholders, not to a base image (-b)".to_string(),
        ));
    }
    // Letterbox is the default fit and changes nothing for placeholders.
    if !has_base && resize == Some(ResizeMode::Stretch) {
        return Err(GenerateError::UnsupportedOptions(
            "--resize stretch needs a base image (-b)".to_string(),
        ));
    }
    Ok(())
}

/// Open and decode a base image, sniffing the format from its content.
pub fn load_base_image(path: &Path) -> Result<DynamicImage, String> {
    let reader = ImageReader::open(path)
        .map_err(|e| e.to_string())?
        .with_guessed_format()
        .map_err(|e| e.to_string())?;
    let image = reader.decode().map_err(|e| e.to_string())?;
    if image.width() == 0 || image.height() == 0 {
        return Err("base image has no pixels".to_string());
    }
    Ok(image)
}

/// Render one entry to encoded bytes in the entry's format.
pub fn render_icon(target: &IconTarget, source: &IconSource<'_>) -> Result<Vec<u8>, GenerateError> {
    let size = target.size;
    let canvas = match *source {
        IconSource::Placeholder {
            background,
            foreground,
            caption,
        } => {
            let label = size.to_string();
            render_caption(size, background, foreground, caption.unwrap_or(&label))
        }
        IconSource::Base {
            image,
            mode,
            background,
        } => {
            let scaled = match mode {
                ResizeMode::Stretch => {
                    image.resize_exact(size.width, size.height, FilterType::Lanczos3)
                }
                ResizeMode::Letterbox => image.resize(size.width, size.height, FilterType::Lanczos3),
            };
            let mut canvas = RgbaImage::from_pixel(
                size.width,
                size.height,
                image::Rgba(background.to_rgba8()),
            );
            let x = (size.width.saturating_sub(scaled.width()) / 2) as i64;
            let y = (size.height.saturating_sub(scaled.height()) / 2) as i64;
            imageops::overlay(&mut canvas, &scaled.to_rgba8(), x, y);
            DynamicImage::ImageRgba8(canvas).to_rgb8()
        }
    };
    raster::encode(target.format, canvas)
}
