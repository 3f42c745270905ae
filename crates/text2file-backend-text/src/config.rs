//! TOML and INI configuration files.
//!
//! Content is read as a settings mapping, trying JSON, then YAML, then
//! INI, and re-serialized in the target format. Text that is none of these
//! is stored under a single `content` key.

use ini::Ini;
use serde_json::{Map, Value};
use text2file_spec::{Format, GenerateError, Verdict};

use crate::plain::decode_text;

/// Parse content into a settings mapping.
///
/// A JSON or YAML document that is not a mapping is wrapped as
/// `{"content": <document>}`, and so is text that parses as nothing.
pub fn parse_settings(content: &str) -> Map<String, Value> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Map::new();
    }

    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
            return into_mapping(value);
        }
    }
    if let Ok(Value::Object(map)) = serde_yaml::from_str::<Value>(trimmed) {
        return map;
    }
    if let Some(map) = parse_ini(trimmed) {
        return map;
    }
    into_mapping(Value::String(content.to_string()))
}

fn into_mapping(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("content".to_string(), other);
            map
        }
    }
}

/// INI sections become nested mappings. `None` when the text is not INI or
/// holds no keys.
fn parse_ini(text: &str) -> Option<Map<String, Value>> {
    let ini = Ini::load_from_str(text).ok()?;
    let mut map = Map::new();
    let mut keys = 0usize;
    for (section, properties) in ini.iter() {
        let entries: Map<String, Value> = properties
            .iter()
            .map(|(key, value)| (key.to_string(), ini_scalar(value)))
            .collect();
        keys += entries.len();
        match section {
            Some(name) => {
                map.insert(name.to_string(), Value::Object(entries));
            }
            None => map.extend(entries),
        }
    }
    (keys > 0).then_some(map)
}

/// Booleans, integers and finite floats keep their type; everything else
/// stays a string.
fn ini_scalar(raw: &str) -> Value {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if raw.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(n) = raw.parse::<i64>() {
            return Value::from(n);
        }
    }
    match raw.parse::<f64>() {
        Ok(f) if f.is_finite() => Value::from(f),
        _ => Value::String(raw.to_string()),
    }
}

/// TOML has no null; null values and null array items are dropped.
fn toml_value(value: &Value) -> Option<toml::Value> {
    Some(match value {
        Value::Null => return None,
        Value::Bool(b) => toml::Value::Boolean(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => toml::Value::Integer(i),
            None => toml::Value::Float(n.as_f64()?),
        },
        Value::String(s) => toml::Value::String(s.clone()),
        Value::Array(items) => toml::Value::Array(items.iter().filter_map(toml_value).collect()),
        Value::Object(map) => toml::Value::Table(toml_table(map)),
    })
}

fn toml_table(map: &Map<String, Value>) -> toml::Table {
    map.iter()
        .filter_map(|(key, value)| Some((key.clone(), toml_value(value)?)))
        .collect()
}

/// Scalars as written; arrays and mappings nested below a section as JSON.
fn ini_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(_) | Value::Number(_) | Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

fn write_ini(settings: &Map<String, Value>) -> Result<Vec<u8>, GenerateError> {
    let mut ini = Ini::new();
    for (key, value) in settings {
        if !value.is_object() {
            ini.with_general_section().set(key.as_str(), ini_text(value));
        }
    }
    for (section, value) in settings {
        if let Value::Object(entries) = value {
            for (key, value) in entries {
                ini.with_section(Some(section.as_str()))
                    .set(key.as_str(), ini_text(value));
            }
        }
    }
    let mut out = Vec::new();
    ini.write_to(&mut out)
        .map_err(|e| GenerateError::backend(Format::Ini, e))?;
    Ok(out)
}

pub fn generate(format: Format, content: &str) -> Result<Vec<u8>, GenerateError> {
    let settings = parse_settings(content);
    match format {
        Format::Toml => toml::to_string(&toml_table(&settings))
            .map(String::into_bytes)
            .map_err(|e| GenerateError::backend(format, e)),
        Format::Ini => write_ini(&settings),
        other => Err(GenerateError::backend(other, "not a configuration format")),
    }
}

pub fn validate(format: Format, bytes: &[u8]) -> Verdict {
    let text = match decode_text(bytes) {
        Ok(text) => text,
        Err(reason) => return Verdict::invalid(reason),
    };
    match format {
        Format::Toml => match toml::from_str::<toml::Table>(text) {
            Ok(table) => Verdict::valid(format!("TOML with {} top-level keys", table.len())),
            Err(e) => Verdict::invalid(format!("invalid TOML: {}", e)),
        },
        Format::Ini => match Ini::load_from_str(text) {
            Ok(ini) => {
                let sections = ini.sections().filter(Option::is_some).count();
                let keys: usize = ini.iter().map(|(_, properties)| properties.len()).sum();
                Verdict::valid(format!("INI with {} sections, {} keys", sections, keys))
            }
            Err(e) => Verdict::invalid(format!("invalid INI: {}", e)),
        },
        other => Verdict::invalid(format!("{} is not a configuration format", other)),
    }
}
