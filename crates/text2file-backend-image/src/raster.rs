//! Raster encoding and decode-based validation.

use image::codecs::gif::GifEncoder;
use image::{DynamicImage, ExtendedColorType, ImageFormat, RgbImage};
use std::io::Cursor;
use text2file_spec::{Format, GenerateError, Verdict};

use crate::png::{read_png_header, write_rgb_to_vec, PngConfig};

/// Quantizer speed for GIF output (1 is slowest, 30 fastest).
const GIF_SPEED: i32 = 10;

fn image_format(format: Format) -> Option<ImageFormat> {
    match format {
        Format::Png => Some(ImageFormat::Png),
        Format::Jpg => Some(ImageFormat::Jpeg),
        Format::Bmp => Some(ImageFormat::Bmp),
        Format::Gif => Some(ImageFormat::Gif),
        _ => None,
    }
}

/// Encode a canvas in the requested raster format.
pub fn encode(format: Format, canvas: RgbImage) -> Result<Vec<u8>, GenerateError> {
    match format {
        Format::Png => write_rgb_to_vec(&canvas, &PngConfig::default())
            .map_err(|e| GenerateError::backend(format, e)),
        Format::Gif => {
            let rgba = DynamicImage::ImageRgb8(canvas).to_rgba8();
            let mut out = Vec::new();
            {
                let mut encoder = GifEncoder::new_with_speed(&mut out, GIF_SPEED);
                encoder
                    .encode(
                        rgba.as_raw(),
                        rgba.width(),
                        rgba.height(),
                        ExtendedColorType::Rgba8,
                    )
                    .map_err(|e| GenerateError::backend(format, e))?;
            }
            Ok(out)
        }
        Format::Jpg | Format::Bmp => {
            let target = image_format(format)
                .ok_or_else(|| GenerateError::backend(format, "no encoder"))?;
            let mut cursor = Cursor::new(Vec::new());
            DynamicImage::ImageRgb8(canvas)
                .write_to(&mut cursor, target)
                .map_err(|e| GenerateError::backend(format, e))?;
            Ok(cursor.into_inner())
        }
        other => Err(GenerateError::backend(other, "not a raster format")),
    }
}

/// Check the signature matches the claimed format, then decode fully.
pub fn validate(format: Format, bytes: &[u8]) -> Verdict {
    let Some(expected) = image_format(format) else {
        return Verdict::invalid(format!("{} is not a raster format", format));
    };
    if bytes.is_empty() {
        return Verdict::invalid("empty file");
    }
    if format == Format::Png {
        if let Err(reason) = read_png_header(bytes) {
            return Verdict::invalid(reason);
        }
    }

    match image::guess_format(bytes) {
        Ok(detected) if detected == expected => {}
        Ok(detected) => {
            return Verdict::invalid(format!(
                "content is {:?}, not {}",
                detected, format
            ))
        }
        Err(_) => return Verdict::invalid("unrecognized image signature"),
    }

    match image::load_from_memory_with_format(bytes, expected) {
        Ok(image) if image.width() == 0 || image.height() == 0 => {
            Verdict::invalid(format!("zero dimension {}x{}", image.width(), image.height()))
        }
        Ok(image) => Verdict::valid(format!(
            "{} {}x{}",
            format.extension().to_ascii_uppercase(),
            image.width(),
            image.height()
        )),
        Err(e) => Verdict::invalid(format!("decode failed: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn checker() -> RgbImage {
        RgbImage::from_fn(24, 16, |x, y| {
            if (x / 4 + y / 4) % 2 == 0 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        })
    }

    #[test]
    fn every_raster_format_round_trips() {
        for format in [Format::Png, Format::Jpg, Format::Bmp, Format::Gif] {
            let bytes = encode(format, checker()).unwrap();
            let verdict = validate(format, &bytes);
            assert_eq!(
                verdict,
                Verdict::valid(format!("{} 24x16", format.extension().to_ascii_uppercase())),
                "{format}"
            );
        }
    }

    #[test]
    fn mismatched_signature_is_invalid() {
        let png = encode(Format::Png, checker()).unwrap();
        match validate(Format::Jpg, &png) {
            Verdict::Invalid { reason } => assert!(reason.contains("Png"), "{reason}"),
            other => panic!("expected invalid, got {other:?}"),
        }
    }

    #[test]
    fn truncated_data_is_invalid() {
        let jpg = encode(Format::Jpg, checker()).unwrap();
        assert!(!validate(Format::Jpg, &jpg[..20]).is_valid());
        assert!(!validate(Format::Gif, b"GIF89a").is_valid());
        assert!(!validate(Format::Bmp, b"").is_valid());
        assert!(!validate(Format::Png, b"\x89PNG\r\n\x1a\n").is_valid());
    }
}
