//! Text helpers shared by the layout-based generators.

use crate::error::GenerateError;

/// Apply the trailing newline policy: exactly one `\n` is appended when the
/// content does not already end with one. Empty content stays empty.
pub fn with_trailing_newline(content: &str) -> String {
    let mut out = String::with_capacity(content.len() + 1);
    out.push_str(content);
    if !content.is_empty() && !content.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// Reject control characters other than tab, carriage return and newline.
///
/// Text and XML outputs cannot carry them and still validate, so generators
/// that write content verbatim refuse it up front.
pub fn reject_control_chars(content: &str) -> Result<(), GenerateError> {
    for (line_no, line) in content.split('\n').enumerate() {
        if let Some(c) = line.chars().find(|c| c.is_control() && !matches!(c, '\r' | '\t')) {
            return Err(GenerateError::InvalidOption(format!(
                "content has control character U+{:04X} on line {}",
                c as u32,
                line_no + 1
            )));
        }
    }
    Ok(())
}

/// Greedy word wrap to at most `columns` characters per line.
///
/// Explicit newlines are kept as paragraph breaks, words longer than a
/// line are split hard, and runs of spaces collapse.
pub fn wrap_lines(text: &str, columns: usize) -> Vec<String> {
    let columns = columns.max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_len = 0usize;

        for word in paragraph.split_whitespace() {
            let mut chars: Vec<char> = word.chars().collect();
            while chars.len() > columns {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let rest = chars.split_off(columns);
                lines.push(chars.into_iter().collect());
                chars = rest;
            }
            let word_len = chars.len();
            if word_len == 0 {
                continue;
            }
            if current_len > 0 && current_len + 1 + word_len > columns {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(chars);
            current_len += word_len;
        }
        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn newline_policy() {
        assert_eq!(with_trailing_newline("a"), "a\n");
        assert_eq!(with_trailing_newline("a\n"), "a\n");
        assert_eq!(with_trailing_newline("a\n\n"), "a\n\n");
        assert_eq!(with_trailing_newline(""), "");
    }

    #[test]
    fn wraps_at_word_boundaries() {
        assert_eq!(
            wrap_lines("the quick brown fox jumps", 10),
            vec!["the quick", "brown fox", "jumps"]
        );
    }

    #[test]
    fn keeps_paragraphs_and_splits_long_words() {
        assert_eq!(
            wrap_lines("ab\n\nabcdefghij", 4),
            vec!["ab", "", "abcd", "efgh", "ij"]
        );
    }

    #[test]
    fn control_characters_are_refused() {
        assert!(reject_control_chars("tab\there\r\nok").is_ok());
        let err = reject_control_chars("fine\nding\u{7} done\u{1b}[0m").unwrap_err();
        assert_eq!(
            err,
            GenerateError::InvalidOption(
                "content has control character U+0007 on line 2".to_string()
            )
        );
    }

    #[test]
    fn empty_text_has_no_lines() {
        assert!(wrap_lines("", 10).is_empty());
    }
}
