//! Delimited tabular text.
//!
//! Input content is rows separated by newlines with fields separated by
//! commas (or tabs, when the content contains any). Output follows RFC 4180
//! quoting with the delimiter of the target format.

use text2file_spec::{Format, GenerateError, GenerateOptions, Verdict};

use crate::plain::decode_text;

/// Rectangular rows ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub rows: Vec<Vec<String>>,
    pub columns: usize,
}

/// Split content into rows and normalize ragged rows.
///
/// With a header the first row fixes the width: short rows are padded with
/// empty fields and long rows truncated. Without a header every row is
/// padded to the widest one.
pub fn parse_rows(content: &str, has_header: bool) -> Result<Table, GenerateError> {
    let delimiter = if content.contains('\t') { '\t' } else { ',' };
    let mut rows: Vec<Vec<String>> = content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.split(delimiter).map(str::to_string).collect())
        .collect();

    if rows.is_empty() {
        return Err(GenerateError::InvalidOption(
            "tabular content has no rows".to_string(),
        ));
    }

    let columns = if has_header {
        rows[0].len()
    } else {
        rows.iter().map(Vec::len).max().unwrap_or(0)
    };
    for row in &mut rows {
        row.resize(columns, String::new());
    }

    Ok(Table { rows, columns })
}

/// Render a table with RFC 4180 quoting, one `\n`-terminated line per row.
pub fn write_delimited(table: &Table, delimiter: char) -> String {
    let mut out = String::new();
    for row in &table.rows {
        for (i, field) in row.iter().enumerate() {
            if i > 0 {
                out.push(delimiter);
            }
            push_field(&mut out, field, delimiter);
        }
        out.push('\n');
    }
    out
}

fn push_field(out: &mut String, field: &str, delimiter: char) {
    let needs_quotes = field
        .chars()
        .any(|c| c == delimiter || matches!(c, '"' | '\r' | '\n'));
    if needs_quotes {
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(field);
    }
}

/// Parse RFC 4180 delimited text. Blank lines are skipped.
pub fn parse_delimited(text: &str, delimiter: char) -> Result<Vec<Vec<String>>, String> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut closed_quote = false;
    let mut line = 1usize;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => {
                    in_quotes = false;
                    closed_quote = true;
                }
                _ => {
                    if c == '\n' {
                        line += 1;
                    }
                    field.push(c);
                }
            }
            continue;
        }

        match c {
            '"' if field.is_empty() && !closed_quote => in_quotes = true,
            '"' => return Err(format!("unexpected quote on line {}", line)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                record.push(std::mem::take(&mut field));
                let blank = record.len() == 1 && record[0].is_empty() && !closed_quote;
                if !blank {
                    records.push(std::mem::take(&mut record));
                }
                record.clear();
                closed_quote = false;
                line += 1;
            }
            d if d == delimiter => {
                record.push(std::mem::take(&mut field));
                closed_quote = false;
            }
            _ if closed_quote => {
                return Err(format!(
                    "unexpected character after closing quote on line {}",
                    line
                ))
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(format!("unterminated quoted field starting before line {}", line));
    }
    if !field.is_empty() || !record.is_empty() || closed_quote {
        record.push(field);
        records.push(record);
    }
    Ok(records)
}

fn delimiter_for(format: Format) -> char {
    match format {
        Format::Tsv => '\t',
        _ => ',',
    }
}

pub fn generate(
    format: Format,
    content: &str,
    options: &GenerateOptions,
) -> Result<Vec<u8>, GenerateError> {
    let table = parse_rows(content, options.has_header)?;
    Ok(write_delimited(&table, delimiter_for(format)).into_bytes())
}

pub fn validate(format: Format, bytes: &[u8]) -> Verdict {
    let text = match decode_text(bytes) {
        Ok(text) => text,
        Err(reason) => return Verdict::invalid(reason),
    };
    match parse_delimited(text, delimiter_for(format)) {
        Ok(records) if records.is_empty() => Verdict::invalid("no rows"),
        Ok(records) => {
            let columns = records.iter().map(Vec::len).max().unwrap_or(0);
            Verdict::valid(format!("{} rows, {} columns", records.len(), columns))
        }
        Err(reason) => Verdict::invalid(reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ragged_rows_follow_header_width() {
        let options = GenerateOptions::default();
        let bytes = generate(Format::Csv, "A,B\n1,2\n3", &options).unwrap();
        assert_eq!(String::from_utf8(bytes.clone()).unwrap(), "A,B\n1,2\n3,\n");
        assert_eq!(validate(Format::Csv, &bytes), Verdict::valid("3 rows, 2 columns"));
    }

    #[test]
    fn long_rows_are_truncated_with_header() {
        let table = parse_rows("a,b\n1,2,3,4\n", true).unwrap();
        assert_eq!(table.rows[1], vec!["1", "2"]);
    }

    #[test]
    fn without_header_rows_pad_to_widest() {
        let table = parse_rows("a\n1,2,3\n\n  \nx,y", false).unwrap();
        assert_eq!(table.columns, 3);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0], vec!["a", "", ""]);
    }

    #[test]
    fn tab_content_switches_delimiter() {
        let table = parse_rows("a\tb,c\n1\t2", true).unwrap();
        assert_eq!(table.rows[0], vec!["a", "b,c"]);
        let csv = write_delimited(&table, ',');
        assert_eq!(csv, "a,\"b,c\"\n1,2\n");
    }

    #[test]
    fn tsv_uses_tabs() {
        let bytes = generate(Format::Tsv, "x,y\r\n1,\"q\"", &GenerateOptions::default()).unwrap();
        assert_eq!(String::from_utf8(bytes.clone()).unwrap(), "x\ty\n1\t\"\"\"q\"\"\"\n");
        assert!(validate(Format::Tsv, &bytes).is_valid());
    }

    #[test]
    fn empty_content_is_an_option_error() {
        let err = generate(Format::Csv, "\n  \n", &GenerateOptions::default()).unwrap_err();
        assert!(matches!(err, GenerateError::InvalidOption(_)));
    }

    #[test]
    fn parser_handles_quotes() {
        let records = parse_delimited("a,\"b,\"\"c\"\"\"\r\n\"multi\nline\",x\n", ',').unwrap();
        assert_eq!(
            records,
            vec![
                vec!["a".to_string(), "b,\"c\"".to_string()],
                vec!["multi\nline".to_string(), "x".to_string()],
            ]
        );
    }

    #[test]
    fn validator_rejects_broken_csv() {
        assert_eq!(validate(Format::Csv, b""), Verdict::invalid("no rows"));
        assert!(!validate(Format::Csv, b"a,\"open\n").is_valid());
        assert!(!validate(Format::Csv, b"a,b\"c\n").is_valid());
        assert!(!validate(Format::Csv, b"\"a\"b\n").is_valid());
        assert!(!validate(Format::Csv, &[0x41, 0x2c, 0xff]).is_valid());
    }
}
