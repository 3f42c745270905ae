//! Single-font text PDFs.
//!
//! Pages are US Letter with one-inch margins; content is set in the
//! built-in Courier face, so no font program needs to be embedded.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use text2file_spec::text::wrap_lines;
use text2file_spec::{Format, GenerateError, Verdict};

const PAGE_WIDTH: i64 = 612;
const PAGE_HEIGHT: i64 = 792;
const MARGIN: i64 = 72;
const FONT_SIZE: i64 = 11;
const LEADING: i64 = 14;
/// Courier advances 0.6em, so 468pt of text width holds 70 columns.
const COLUMNS: usize = 70;
const LINES_PER_PAGE: usize = ((PAGE_HEIGHT - 2 * MARGIN) / LEADING) as usize;

/// Map text to what the standard Courier encoding can show.
fn printable(line: &str) -> String {
    line.chars()
        .map(|c| if c == ' ' || c.is_ascii_graphic() { c } else { '?' })
        .collect()
}

fn page_operations(lines: &[String]) -> Vec<Operation> {
    let mut ops = vec![
        Operation::new("BT", vec![]),
        Operation::new(
            "Tf",
            vec![Object::Name(b"F1".to_vec()), Object::Integer(FONT_SIZE)],
        ),
        Operation::new("TL", vec![Object::Integer(LEADING)]),
        Operation::new(
            "Td",
            vec![
                Object::Integer(MARGIN),
                Object::Integer(PAGE_HEIGHT - MARGIN - FONT_SIZE),
            ],
        ),
    ];
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            ops.push(Operation::new("T*", vec![]));
        }
        ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(printable(line))],
        ));
    }
    ops.push(Operation::new("ET", vec![]));
    ops
}

pub fn generate(content: &str) -> Result<Vec<u8>, GenerateError> {
    let lines = wrap_lines(content, COLUMNS);
    let mut pages: Vec<&[String]> = lines.chunks(LINES_PER_PAGE).collect();
    if pages.is_empty() {
        pages.push(&[]);
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::with_capacity(pages.len());
    for page in &pages {
        let content = Content {
            operations: page_operations(page),
        };
        let encoded = content
            .encode()
            .map_err(|e| GenerateError::backend(Format::Pdf, e))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(count),
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(PAGE_WIDTH),
                Object::Integer(PAGE_HEIGHT),
            ],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| GenerateError::backend(Format::Pdf, e))?;
    Ok(out)
}

pub fn validate(bytes: &[u8]) -> Verdict {
    if !bytes.starts_with(b"%PDF-") {
        return Verdict::invalid("missing %PDF- header");
    }
    let doc = match Document::load_mem(bytes) {
        Ok(doc) => doc,
        Err(e) => return Verdict::invalid(format!("unreadable PDF: {}", e)),
    };
    if doc.is_encrypted() {
        return Verdict::invalid("PDF is encrypted");
    }
    match doc.get_pages().len() {
        0 => Verdict::invalid("PDF has no pages"),
        1 => Verdict::valid(format!("PDF {}, 1 page", doc.version)),
        n => Verdict::valid(format!("PDF {}, {} pages", doc.version, n)),
    }
}
