//! PDF serialization of laid-out pages with lopdf.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document as LopdfDocument, Object, Stream, StringFormat};

use super::layout::{DrawOp, LaidOutPage};
use super::style::{Color, FontFace, PageGeometry};
use crate::error::{Error, Result};

const PDF_VERSION: &str = "1.5";
const PRODUCER: &str = concat!("iepsheet ", env!("CARGO_PKG_VERSION"));

/// Serialize pages into a complete PDF file.
///
/// Output depends only on the inputs; no timestamps or random IDs are
/// written, so identical reports produce identical bytes.
pub fn write_pdf(pages: &[LaidOutPage], geometry: PageGeometry, title: &str) -> Result<Vec<u8>> {
    let mut doc = LopdfDocument::with_version(PDF_VERSION);
    let pages_id = doc.new_object_id();

    let mut fonts = lopdf::Dictionary::new();
    for face in [FontFace::Helvetica, FontFace::HelveticaBold] {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => face.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(face.resource_name(), font_id);
    }
    let resources_id = doc.add_object(dictionary! {
        "Font" => fonts,
    });

    let mut kids = Vec::with_capacity(pages.len());
    for page in pages {
        let content = Content {
            operations: page_operations(page),
        };
        let encoded = content
            .encode()
            .map_err(|e| Error::ComposeFailure(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let page_count = kids.len() as i64;
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => Object::Integer(page_count),
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(geometry.width),
            Object::Real(geometry.height),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::String(encode_win_ansi(title), StringFormat::Literal),
        "Producer" => Object::String(PRODUCER.as_bytes().to_vec(), StringFormat::Literal),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| Error::ComposeFailure(e.to_string()))?;
    Ok(buffer)
}

fn page_operations(page: &LaidOutPage) -> Vec<Operation> {
    let mut ops = Vec::new();

    for op in &page.ops {
        match op {
            DrawOp::Text {
                x,
                y,
                face,
                size,
                color,
                text,
            } => {
                ops.push(Operation::new("BT", vec![]));
                ops.push(Operation::new(
                    "Tf",
                    vec![
                        Object::Name(face.resource_name().as_bytes().to_vec()),
                        Object::Real(*size),
                    ],
                ));
                ops.push(Operation::new("rg", color_operands(color)));
                ops.push(Operation::new(
                    "Td",
                    vec![Object::Real(*x), Object::Real(*y)],
                ));
                ops.push(Operation::new(
                    "Tj",
                    vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
                ));
                ops.push(Operation::new("ET", vec![]));
            }
            DrawOp::FillRect {
                x,
                y,
                width,
                height,
                color,
            } => {
                ops.push(Operation::new("rg", color_operands(color)));
                ops.push(Operation::new("re", rect_operands(*x, *y, *width, *height)));
                ops.push(Operation::new("f", vec![]));
            }
            DrawOp::StrokeRect {
                x,
                y,
                width,
                height,
                line_width,
                color,
            } => {
                ops.push(Operation::new("RG", color_operands(color)));
                ops.push(Operation::new("w", vec![Object::Real(*line_width)]));
                ops.push(Operation::new("re", rect_operands(*x, *y, *width, *height)));
                ops.push(Operation::new("S", vec![]));
            }
        }
    }

    ops
}

fn color_operands(color: &Color) -> Vec<Object> {
    vec![
        Object::Real(color.r),
        Object::Real(color.g),
        Object::Real(color.b),
    ]
}

fn rect_operands(x: f32, y: f32, width: f32, height: f32) -> Vec<Object> {
    vec![
        Object::Real(x),
        Object::Real(y),
        Object::Real(width),
        Object::Real(height),
    ]
}

/// Encode text for the standard fonts' WinAnsiEncoding.
///
/// Latin-1 maps directly; common typographic punctuation maps to its
/// Windows-1252 slot; everything else becomes `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7e}' | '\u{a0}'..='\u{ff}' => c as u8,
            '\u{20ac}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            _ => b'?',
        })
        .collect()
}
