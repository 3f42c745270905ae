//! Office Open XML packages: `xlsx` workbooks and `docx` documents.
//!
//! Both are zip containers of XML parts. Generation writes the minimal part
//! set each application needs; validation opens the container, checks the
//! required parts exist and that the main part is well-formed.

use std::io::{Cursor, Read, Write};
use text2file_backend_text::tabular::parse_rows;
use text2file_backend_text::xml::{escape, inspect_xml, XmlSummary};
use text2file_spec::text::reject_control_chars;
use text2file_spec::{Format, GenerateError, GenerateOptions, Verdict};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const CONTENT_TYPES: &str = "[Content_Types].xml";
const PACKAGE_RELS: &str = "_rels/.rels";
const WORKBOOK: &str = "xl/workbook.xml";
const WORKBOOK_RELS: &str = "xl/_rels/workbook.xml.rels";
const SHEET: &str = "xl/worksheets/sheet1.xml";
const DOCUMENT: &str = "word/document.xml";

const NS_SPREADSHEET: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const NS_WORD: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_PACKAGE_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

/// Spreadsheet column name for a zero-based index: 0 → A, 25 → Z, 26 → AA.
pub fn column_name(mut index: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

fn package(format: Format, parts: &[(&str, String)]) -> Result<Vec<u8>, GenerateError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, body) in parts {
        writer
            .start_file(*name, options)
            .map_err(|e| GenerateError::backend(format, e))?;
        writer
            .write_all(body.as_bytes())
            .map_err(|e| GenerateError::backend(format, e))?;
    }
    let cursor = writer
        .finish()
        .map_err(|e| GenerateError::backend(format, e))?;
    Ok(cursor.into_inner())
}

fn content_types(overrides: &[(&str, &str)]) -> String {
    let mut xml = format!(
        r#"{XML_DECL}<Types xmlns="{NS_CONTENT_TYPES}"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/>"#
    );
    for (part, content_type) in overrides {
        xml.push_str(&format!(
            r#"<Override PartName="/{part}" ContentType="{content_type}"/>"#
        ));
    }
    xml.push_str("</Types>");
    xml
}

fn relationships(kind: &str, target: &str) -> String {
    format!(
        r#"{XML_DECL}<Relationships xmlns="{NS_PACKAGE_REL}"><Relationship Id="rId1" Type="{NS_REL}/{kind}" Target="{target}"/></Relationships>"#
    )
}

fn cell(reference: &str, value: &str) -> String {
    let numeric = value.parse::<f64>().map(f64::is_finite).unwrap_or(false);
    if numeric {
        format!(r#"<c r="{reference}"><v>{value}</v></c>"#)
    } else {
        format!(
            r#"<c r="{reference}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
            escape(value)
        )
    }
}

pub fn generate_xlsx(content: &str, options: &GenerateOptions) -> Result<Vec<u8>, GenerateError> {
    let sheet_name = options.checked_sheet_name()?;
    reject_control_chars(content)?;
    let table = parse_rows(content, options.has_header)?;

    let mut sheet = format!(r#"{XML_DECL}<worksheet xmlns="{NS_SPREADSHEET}"><sheetData>"#);
    for (r, row) in table.rows.iter().enumerate() {
        sheet.push_str(&format!(r#"<row r="{}">"#, r + 1));
        for (c, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            sheet.push_str(&cell(&format!("{}{}", column_name(c), r + 1), value));
        }
        sheet.push_str("</row>");
    }
    sheet.push_str("</sheetData></worksheet>");

    let workbook = format!(
        r#"{XML_DECL}<workbook xmlns="{NS_SPREADSHEET}" xmlns:r="{NS_REL}"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        escape(sheet_name)
    );

    package(
        Format::Xlsx,
        &[
            (
                CONTENT_TYPES,
                content_types(&[
                    (WORKBOOK, "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"),
                    (SHEET, "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"),
                ]),
            ),
            (PACKAGE_RELS, relationships("officeDocument", WORKBOOK)),
            (WORKBOOK, workbook),
            (WORKBOOK_RELS, relationships("worksheet", "worksheets/sheet1.xml")),
            (SHEET, sheet),
        ],
    )
}

pub fn generate_docx(content: &str) -> Result<Vec<u8>, GenerateError> {
    reject_control_chars(content)?;
    let mut document = format!(r#"{XML_DECL}<w:document xmlns:w="{NS_WORD}"><w:body>"#);
    for line in content.lines() {
        document.push_str(&format!(
            r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
            escape(line)
        ));
    }
    document.push_str("<w:sectPr/></w:body></w:document>");

    package(
        Format::Docx,
        &[
            (
                CONTENT_TYPES,
                content_types(&[(
                    DOCUMENT,
                    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
                )]),
            ),
            (PACKAGE_RELS, relationships("officeDocument", DOCUMENT)),
            (DOCUMENT, document),
        ],
    )
}

type Archive<'a> = ZipArchive<Cursor<&'a [u8]>>;

fn open_package(bytes: &[u8]) -> Result<Archive<'_>, String> {
    ZipArchive::new(Cursor::new(bytes)).map_err(|e| format!("not a zip container: {}", e))
}

fn read_part(archive: &mut Archive<'_>, name: &str) -> Result<Vec<u8>, String> {
    let mut part = archive
        .by_name(name)
        .map_err(|_| format!("missing part {}", name))?;
    let mut data = Vec::new();
    part.read_to_end(&mut data)
        .map_err(|e| format!("unreadable part {}: {}", name, e))?;
    Ok(data)
}

fn inspect_part(archive: &mut Archive<'_>, name: &str) -> Result<XmlSummary, String> {
    let data = read_part(archive, name)?;
    inspect_xml(&data).map_err(|e| format!("{}: {}", name, e))
}

fn check_xlsx(bytes: &[u8]) -> Result<String, String> {
    let mut archive = open_package(bytes)?;
    inspect_part(&mut archive, CONTENT_TYPES)?;
    inspect_part(&mut archive, PACKAGE_RELS)?;

    let workbook = inspect_part(&mut archive, WORKBOOK)?;
    if workbook.root != "workbook" {
        return Err(format!("{} root is <{}>", WORKBOOK, workbook.root));
    }
    let sheets = workbook.count("sheet");
    if sheets == 0 {
        return Err("workbook declares no sheets".to_string());
    }

    let first_sheet = archive
        .file_names()
        .filter(|name| name.starts_with("xl/worksheets/") && name.ends_with(".xml"))
        .min()
        .map(str::to_string)
        .ok_or_else(|| "no worksheet parts".to_string())?;
    let sheet = inspect_part(&mut archive, &first_sheet)?;
    let rows = sheet.count("row");
    if rows == 0 {
        return Err(format!("{} has no rows", first_sheet));
    }
    Ok(format!("XLSX, {} sheet(s), {} rows in first sheet", sheets, rows))
}

fn check_docx(bytes: &[u8]) -> Result<String, String> {
    let mut archive = open_package(bytes)?;
    inspect_part(&mut archive, CONTENT_TYPES)?;
    inspect_part(&mut archive, PACKAGE_RELS)?;
    let document = inspect_part(&mut archive, DOCUMENT)?;
    if document.root != "document" {
        return Err(format!("{} root is <{}>", DOCUMENT, document.root));
    }
    Ok(format!("DOCX, {} paragraphs", document.count("p")))
}

pub fn validate(format: Format, bytes: &[u8]) -> Verdict {
    let checked = match format {
        Format::Xlsx => check_xlsx(bytes),
        Format::Docx => check_docx(bytes),
        other => Err(format!("{} is not an Office Open XML format", other)),
    };
    match checked {
        Ok(detail) => Verdict::valid(detail),
        Err(reason) => Verdict::invalid(reason),
    }
}
