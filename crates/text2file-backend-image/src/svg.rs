//! SVG documents: a background rectangle and one `<text>` per wrapped line.

use std::fmt::Write as _;
use text2file_backend_text::xml::{escape, inspect_xml};
use text2file_spec::text::{reject_control_chars, wrap_lines};
use text2file_spec::{Format, GenerateError, GenerateOptions, Verdict};

pub fn generate(content: &str, options: &GenerateOptions) -> Result<Vec<u8>, GenerateError> {
    let size = options.dimensions()?;
    reject_control_chars(content)?;
    let (width, height) = (size.width, size.height);
    let font_size = (width.min(height) / 20).max(8);
    let line_height = font_size + font_size / 4;
    let margin = (width.min(height) / 16).max(2);
    // Monospace glyphs are roughly 0.6em wide.
    let columns = ((width.saturating_sub(2 * margin) * 10) / (font_size * 6)).max(1) as usize;

    let mut svg = String::new();
    let write = |svg: &mut String| -> std::fmt::Result {
        writeln!(svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = width,
            h = height
        )?;
        writeln!(
            svg,
            r#"  <rect width="100%" height="100%" fill="{}"/>"#,
            options.background
        )?;
        let mut y = margin + font_size;
        for line in wrap_lines(content, columns) {
            if y > height.saturating_sub(margin) {
                break;
            }
            writeln!(
                svg,
                r#"  <text x="50%" y="{}" text-anchor="middle" font-family="monospace" font-size="{}" fill="{}" xml:space="preserve">{}</text>"#,
                y,
                font_size,
                options.foreground,
                escape(&line)
            )?;
            y += line_height;
        }
        writeln!(svg, "</svg>")
    };
    write(&mut svg).map_err(|e| GenerateError::backend(Format::Svg, e))?;
    Ok(svg.into_bytes())
}

/// Leading numeric part of a length such as `120px`; `None` for `auto` etc.
fn parse_length(value: &str) -> Option<f64> {
    let value = value.trim();
    let end = value
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
        .unwrap_or(value.len());
    value[..end].parse().ok()
}

pub fn validate(bytes: &[u8]) -> Verdict {
    let summary = match inspect_xml(bytes) {
        Ok(summary) => summary,
        Err(reason) => return Verdict::invalid(reason),
    };
    if summary.root != "svg" {
        return Verdict::invalid(format!("root element is <{}>, not <svg>", summary.root));
    }
    for attr in ["width", "height"] {
        if let Some(length) = summary.root_attribute(attr).and_then(parse_length) {
            if length <= 0.0 {
                return Verdict::invalid(format!("non-positive {} {}", attr, length));
            }
        }
    }
    Verdict::valid(format!(
        "SVG {}x{}",
        summary.root_attribute("width").unwrap_or("?"),
        summary.root_attribute("height").unwrap_or("?")
    ))
}
