//! Text layout on raster canvases.

use image::{Rgb as Pixel, RgbImage};
use text2file_spec::text::wrap_lines;
use text2file_spec::{Dimensions, Rgb};

use crate::font::{draw_text, text_width, ADVANCE, GLYPH_HEIGHT, LINE_HEIGHT};

/// A canvas filled with `background`.
pub fn blank(size: Dimensions, background: Rgb) -> RgbImage {
    RgbImage::from_pixel(size.width, size.height, Pixel(background.to_array()))
}

/// Integer glyph scale for body text on a canvas.
pub fn body_scale(size: Dimensions) -> u32 {
    (size.width.min(size.height) / 200).max(1)
}

/// Margin around body text.
pub fn body_margin(size: Dimensions) -> u32 {
    (size.width.min(size.height) / 16).max(2)
}

/// Render word-wrapped, horizontally centered text from the top margin down.
/// Lines that do not fit above the bottom margin are dropped.
pub fn render_text_block(size: Dimensions, background: Rgb, foreground: Rgb, content: &str) -> RgbImage {
    let mut image = blank(size, background);
    let scale = body_scale(size);
    let margin = body_margin(size) as i64;

    let usable = size.width.saturating_sub(2 * margin as u32);
    let columns = ((usable / scale + 1) / ADVANCE).max(1) as usize;
    let bottom = size.height as i64 - margin;
    let mut y = margin;

    for line in wrap_lines(content, columns) {
        if y + (GLYPH_HEIGHT * scale) as i64 > bottom {
            break;
        }
        let width = text_width(line.chars().count(), scale) as i64;
        let x = (size.width as i64 - width) / 2;
        draw_text(&mut image, x, y, &line, scale, foreground);
        y += (LINE_HEIGHT * scale) as i64;
    }

    image
}

/// Largest integer scale at which `caption` fits inside 90% of the canvas.
pub fn caption_scale(size: Dimensions, caption: &str) -> u32 {
    let chars = caption.chars().count();
    let max_w = size.width * 9 / 10;
    let max_h = size.height * 9 / 10;
    if chars == 0 {
        return 1;
    }
    let by_width = max_w / text_width(chars, 1);
    let by_height = max_h / GLYPH_HEIGHT;
    by_width.min(by_height).max(1)
}

/// Render a single caption centered on the canvas.
pub fn render_caption(size: Dimensions, background: Rgb, foreground: Rgb, caption: &str) -> RgbImage {
    let mut image = blank(size, background);
    let caption = caption.trim();
    let scale = caption_scale(size, caption);
    let width = text_width(caption.chars().count(), scale) as i64;
    let height = (GLYPH_HEIGHT * scale) as i64;
    let x = (size.width as i64 - width) / 2;
    let y = (size.height as i64 - height) / 2;
    draw_text(&mut image, x, y, caption, scale, foreground);
    image
}
