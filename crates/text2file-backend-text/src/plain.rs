//! Plain text and source code.

use text2file_spec::text::with_trailing_newline;
use text2file_spec::Verdict;

/// Content verbatim, newline policy applied.
pub fn generate(content: &str) -> Vec<u8> {
    with_trailing_newline(content).into_bytes()
}

/// Decode `bytes` as text: UTF-8 (a leading BOM is tolerated) with no
/// control characters other than tab, carriage return and newline.
pub fn decode_text(bytes: &[u8]) -> Result<&str, String> {
    let text = std::str::from_utf8(bytes).map_err(|e| {
        format!(
            "not valid UTF-8 (invalid byte at offset {})",
            e.valid_up_to()
        )
    })?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    for (line_no, line) in text.split('\n').enumerate() {
        if let Some(c) = line
            .chars()
            .find(|c| c.is_control() && !matches!(c, '\r' | '\t'))
        {
            return Err(format!(
                "control character U+{:04X} on line {}",
                c as u32,
                line_no + 1
            ));
        }
    }
    Ok(text)
}

pub fn validate(bytes: &[u8]) -> Verdict {
    match decode_text(bytes) {
        Ok(text) => Verdict::valid(format!("{} lines of text", text.lines().count())),
        Err(reason) => Verdict::invalid(reason),
    }
}
