//! Deterministic PNG encoding and header inspection.
//!
//! PNG output goes through the `png` crate directly with fixed compression
//! and filter settings so the same canvas always encodes to the same bytes.

use image::RgbImage;
use png::{BitDepth, ColorType, Compression, Encoder, FilterType};
use thiserror::Error;

/// Errors from PNG encoding.
#[derive(Debug, Error)]
pub enum PngError {
    #[error("PNG encoding error: {0}")]
    Encoding(#[from] png::EncodingError),
}

/// PNG export settings.
#[derive(Debug, Clone)]
pub struct PngConfig {
    pub compression: Compression,
    pub filter: FilterType,
}

impl Default for PngConfig {
    fn default() -> Self {
        Self {
            compression: Compression::Default,
            filter: FilterType::NoFilter,
        }
    }
}

/// Encode an 8-bit RGB canvas.
pub fn write_rgb_to_vec(image: &RgbImage, config: &PngConfig) -> Result<Vec<u8>, PngError> {
    let mut out = Vec::new();
    {
        let mut encoder = Encoder::new(&mut out, image.width(), image.height());
        encoder.set_color(ColorType::Rgb);
        encoder.set_depth(BitDepth::Eight);
        encoder.set_compression(config.compression);
        encoder.set_filter(config.filter);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(image.as_raw())?;
        writer.finish()?;
    }
    Ok(out)
}

/// Fields of the IHDR chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PngHeader {
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_type: u8,
    pub interlaced: bool,
}

const SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Check the PNG signature and the leading IHDR chunk.
pub fn read_png_header(data: &[u8]) -> Result<PngHeader, String> {
    const MIN_LEN: usize = 8 + 8 + 13;

    if data.len() < MIN_LEN {
        return Err(format!("file too short for a PNG header: {} bytes", data.len()));
    }
    if data[..8] != SIGNATURE {
        return Err("missing PNG signature".to_string());
    }

    let chunk_length = u32::from_be_bytes([data[8], data[9], data[10], data[11]]);
    if &data[12..16] != b"IHDR" {
        return Err("first chunk is not IHDR".to_string());
    }
    if chunk_length != 13 {
        return Err(format!("IHDR length is {}, expected 13", chunk_length));
    }

    let ihdr = &data[16..29];
    let width = u32::from_be_bytes([ihdr[0], ihdr[1], ihdr[2], ihdr[3]]);
    let height = u32::from_be_bytes([ihdr[4], ihdr[5], ihdr[6], ihdr[7]]);
    let bit_depth = ihdr[8];
    let color_type = ihdr[9];

    if width == 0 || height == 0 {
        return Err(format!("zero dimension {}x{}", width, height));
    }
    let depth_ok = match color_type {
        0 => matches!(bit_depth, 1 | 2 | 4 | 8 | 16),
        3 => matches!(bit_depth, 1 | 2 | 4 | 8),
        2 | 4 | 6 => matches!(bit_depth, 8 | 16),
        _ => false,
    };
    if !depth_ok {
        return Err(format!(
            "color type {} with bit depth {} is not allowed",
            color_type, bit_depth
        ));
    }
    if ihdr[10] != 0 || ihdr[11] != 0 || ihdr[12] > 1 {
        return Err("unknown compression, filter or interlace method".to_string());
    }

    Ok(PngHeader {
        width,
        height,
        bit_depth,
        color_type,
        interlaced: ihdr[12] == 1,
    })
}
