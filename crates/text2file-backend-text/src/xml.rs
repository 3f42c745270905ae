//! XML well-formedness inspection.
//!
//! Shared by the xml format, svg and the Office Open XML packages.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// What a successful inspection found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlSummary {
    /// Local name of the root element.
    pub root: String,
    /// Root element attributes as (local name, unescaped value).
    pub root_attributes: Vec<(String, String)>,
    /// Number of elements in the document.
    pub elements: usize,
    /// Element count per local name.
    pub counts: BTreeMap<String, usize>,
}

impl XmlSummary {
    pub fn root_attribute(&self, name: &str) -> Option<&str> {
        self.root_attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// How many elements with this local name the document holds.
    pub fn count(&self, name: &str) -> usize {
        self.counts.get(name).copied().unwrap_or(0)
    }
}

/// Escape text for element content or attribute values.
pub fn escape(text: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(text)
}

/// Check that `bytes` is a UTF-8, well-formed XML document with exactly one
/// root element. Returns a human-readable reason on failure.
pub fn inspect_xml(bytes: &[u8]) -> Result<XmlSummary, String> {
    let text = std::str::from_utf8(bytes).map_err(|e| format!("not UTF-8: {}", e))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut depth = 0usize;
    let mut elements = 0usize;
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut root: Option<(String, Vec<(String, String)>)> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| format!("malformed XML at byte {}: {}", reader.buffer_position(), e))?;
        match event {
            Event::Start(start) | Event::Empty(start) if depth == 0 && root.is_some() => {
                return Err(format!(
                    "second root element <{}>",
                    String::from_utf8_lossy(start.local_name().as_ref())
                ));
            }
            Event::Start(start) => {
                let attributes = read_attributes(&start)?;
                let name = local_name(&start);
                if depth == 0 {
                    root = Some((name.clone(), attributes));
                }
                *counts.entry(name).or_default() += 1;
                depth += 1;
                elements += 1;
            }
            Event::Empty(start) => {
                let attributes = read_attributes(&start)?;
                let name = local_name(&start);
                if depth == 0 {
                    root = Some((name.clone(), attributes));
                }
                *counts.entry(name).or_default() += 1;
                elements += 1;
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
            }
            Event::Text(t) if depth == 0 => {
                let raw = String::from_utf8_lossy(&t).into_owned();
                if !raw.trim().is_empty() {
                    return Err("text outside the root element".to_string());
                }
            }
            Event::CData(_) if depth == 0 => {
                return Err("CDATA outside the root element".to_string());
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth != 0 {
        return Err(format!("{} unclosed element(s) at end of document", depth));
    }
    let (root, root_attributes) = root.ok_or_else(|| "no root element".to_string())?;
    Ok(XmlSummary {
        root,
        root_attributes,
        elements,
        counts,
    })
}

fn local_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.local_name().as_ref()).into_owned()
}

fn read_attributes(start: &BytesStart<'_>) -> Result<Vec<(String, String)>, String> {
    let mut out = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| format!("malformed attribute: {}", e))?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| format!("malformed attribute value: {}", e))?
            .into_owned();
        out.push((key, value));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_documents() {
        let summary = inspect_xml(
            br#"<?xml version="1.0"?><!-- note --><svg width="10" height="5"><g><rect/></g></svg>"#,
        )
        .unwrap();
        assert_eq!(summary.root, "svg");
        assert_eq!(summary.elements, 3);
        assert_eq!(summary.count("rect"), 1);
        assert_eq!(summary.count("path"), 0);
        assert_eq!(summary.root_attribute("width"), Some("10"));
    }

    #[test]
    fn namespaced_roots_use_local_names() {
        let summary =
            inspect_xml(br#"<w:document xmlns:w="urn:x"><w:body/></w:document>"#).unwrap();
        assert_eq!(summary.root, "document");
    }

    #[test]
    fn rejects_broken_documents() {
        let cases: [&[u8]; 7] = [
            b"",
            b"plain text",
            b"<a><b></a>",
            b"<a>",
            b"<a/><b/>",
            b"<a x=1/>",
            b"\xff\xfe<a/>",
        ];
        for bad in cases {
            assert!(inspect_xml(bad).is_err(), "{:?}", String::from_utf8_lossy(bad));
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape("a<b & c>"), "a&lt;b &amp; c&gt;");
    }
}
