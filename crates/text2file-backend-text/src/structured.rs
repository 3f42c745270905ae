//! JSON, XML and YAML.
//!
//! Content that already parses as the target format is written verbatim.
//! Anything else is wrapped in a `content` envelope so the output always
//! parses.

use serde::Serialize;
use text2file_spec::text::with_trailing_newline;
use text2file_spec::{Format, GenerateError, Verdict};

use crate::plain::decode_text;
use crate::xml::{escape, inspect_xml};

#[derive(Serialize)]
struct Envelope<'a> {
    content: &'a str,
}

pub fn generate(format: Format, content: &str) -> Result<Vec<u8>, GenerateError> {
    let body = match format {
        Format::Json => {
            if serde_json::from_str::<serde_json::Value>(content).is_ok() {
                with_trailing_newline(content)
            } else {
                let json = serde_json::to_string_pretty(&Envelope { content })
                    .map_err(|e| GenerateError::backend(format, e))?;
                with_trailing_newline(&json)
            }
        }
        Format::Yaml => {
            if serde_yaml::from_str::<serde_yaml::Value>(content).is_ok() {
                with_trailing_newline(content)
            } else {
                serde_yaml::to_string(&Envelope { content })
                    .map_err(|e| GenerateError::backend(format, e))?
            }
        }
        Format::Xml => {
            if inspect_xml(content.as_bytes()).is_ok() {
                with_trailing_newline(content)
            } else {
                format!(
                    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<document>{}</document>\n",
                    escape(content)
                )
            }
        }
        other => {
            return Err(GenerateError::backend(
                other,
                "not a structured text format",
            ))
        }
    };
    Ok(body.into_bytes())
}

pub fn validate(format: Format, bytes: &[u8]) -> Verdict {
    let text = match decode_text(bytes) {
        Ok(text) => text,
        Err(reason) => return Verdict::invalid(reason),
    };
    match format {
        Format::Json => match serde_json::from_str::<serde_json::Value>(text) {
            Ok(value) => Verdict::valid(format!("JSON {}", json_kind(&value))),
            Err(e) => Verdict::invalid(format!("invalid JSON: {}", e)),
        },
        Format::Yaml => match serde_yaml::from_str::<serde_yaml::Value>(text) {
            Ok(_) => Verdict::valid("YAML document"),
            Err(e) => Verdict::invalid(format!("invalid YAML: {}", e)),
        },
        Format::Xml => match inspect_xml(bytes) {
            Ok(summary) => Verdict::valid(format!(
                "XML <{}> with {} elements",
                summary.root, summary.elements
            )),
            Err(reason) => Verdict::invalid(reason),
        },
        other => Verdict::invalid(format!("{} is not a structured text format", other)),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
