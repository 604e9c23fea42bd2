//! Page layout on top of `lopdf`: text cells and rules on A4 with the
//! standard Times fonts, uncompressed content streams.
//!
//! Positions are in millimetres from the top-left corner of the page and
//! converted to PDF points when operations are emitted. Nothing time- or
//! environment-dependent is written unless passed in through [`DocumentInfo`].

use chrono::{DateTime, Utc};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, dictionary};

use crate::error::Result;

use super::fonts::Font;

/// Points per millimetre.
const K: f64 = 72.0 / 25.4;

/// A4 portrait width in millimetres.
pub const PAGE_WIDTH: f64 = 210.0;
/// A4 portrait height in millimetres.
pub const PAGE_HEIGHT: f64 = 297.0;
/// Left, top and right page margin in millimetres.
pub const MARGIN: f64 = 10.0;
/// Horizontal padding inside a cell.
const CELL_MARGIN: f64 = MARGIN / 10.0;
/// Stroke width for borders and rules, in points.
const LINE_WIDTH: f64 = 0.567;

/// Horizontal placement of text inside a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Document information dictionary entries.
#[derive(Debug, Clone)]
pub struct DocumentInfo {
    pub title: String,
    pub producer: String,
    pub created_at: DateTime<Utc>,
}

/// Accumulates page operations and builds the finished document.
#[derive(Debug)]
pub struct PdfWriter {
    pages: Vec<Vec<Operation>>,
    font: Font,
    font_size: f64,
    x: f64,
    y: f64,
}

impl PdfWriter {
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            font: Font::Regular,
            font_size: 10.0,
            x: MARGIN,
            y: MARGIN,
        }
    }

    /// Start a new page with the cursor at the top-left margin.
    pub fn add_page(&mut self) {
        self.pages
            .push(vec![Operation::new("w", vec![real(LINE_WIDTH)])]);
        self.x = MARGIN;
        self.y = MARGIN;
    }

    /// Number of pages started so far.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Move the cursor to the left margin at height `y`.
    pub fn set_y(&mut self, y: f64) {
        self.x = MARGIN;
        self.y = y;
    }

    /// Set the font and size (in points) for following text.
    pub fn set_font(&mut self, font: Font, size: f64) {
        self.font = font;
        self.font_size = size;
    }

    /// Width of `text` in the current font, in millimetres.
    pub fn string_width(&self, text: &str) -> f64 {
        let units: u32 = encode(text)
            .iter()
            .map(|&b| u32::from(self.font.byte_width(b)))
            .sum();
        f64::from(units) * self.font_size / 1000.0 / K
    }

    /// Draw a cell at the cursor.
    ///
    /// A width of zero extends the cell to the right margin. Text is never
    /// wrapped or clipped. With `newline` the cursor moves to the start of the
    /// next line, otherwise to the right edge of the cell.
    pub fn cell(&mut self, w: f64, h: f64, text: &str, border: bool, align: Align, newline: bool) {
        let w = if w == 0.0 { PAGE_WIDTH - MARGIN - self.x } else { w };
        let mut ops = Vec::new();

        if border {
            ops.push(Operation::new(
                "re",
                vec![
                    real(self.x * K),
                    real((PAGE_HEIGHT - self.y) * K),
                    real(w * K),
                    real(-h * K),
                ],
            ));
            ops.push(Operation::new("S", vec![]));
        }

        if !text.is_empty() {
            let dx = match align {
                Align::Left => CELL_MARGIN,
                Align::Center => (w - self.string_width(text)) / 2.0,
                Align::Right => w - CELL_MARGIN - self.string_width(text),
            };
            let baseline = self.y + 0.5 * h + 0.3 * (self.font_size / K);
            ops.extend([
                Operation::new("BT", vec![]),
                Operation::new(
                    "Tf",
                    vec![Object::Name(self.font.resource().into()), real(self.font_size)],
                ),
                Operation::new(
                    "Td",
                    vec![real((self.x + dx) * K), real((PAGE_HEIGHT - baseline) * K)],
                ),
                Operation::new("Tj", vec![Object::string_literal(encode(text))]),
                Operation::new("ET", vec![]),
            ]);
        }

        self.append(ops);

        if newline {
            self.x = MARGIN;
            self.y += h;
        } else {
            self.x += w;
        }
    }

    /// Move to the start of the line `h` millimetres below.
    pub fn ln(&mut self, h: f64) {
        self.x = MARGIN;
        self.y += h;
    }

    /// Draw a straight rule.
    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.append(vec![
            Operation::new("m", vec![real(x1 * K), real((PAGE_HEIGHT - y1) * K)]),
            Operation::new("l", vec![real(x2 * K), real((PAGE_HEIGHT - y2) * K)]),
            Operation::new("S", vec![]),
        ]);
    }

    /// Build the page tree, fonts and info dictionary and serialize them.
    pub fn finish(self, info: &DocumentInfo) -> Result<Vec<u8>> {
        let mut doc = Document::with_version("1.4");
        let pages_id = doc.new_object_id();

        let mut fonts = Dictionary::new();
        for font in Font::ALL {
            let id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(font.resource(), id);
        }
        let resources_id = doc.add_object(dictionary! {
            "Font" => fonts,
        });

        let mut kids = Vec::with_capacity(self.pages.len());
        for operations in self.pages {
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));
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
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    real(PAGE_WIDTH * K),
                    real(PAGE_HEIGHT * K),
                ],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(encode(&info.title)),
            "Producer" => Object::string_literal(encode(&info.producer)),
            "CreationDate" => Object::string_literal(
                info.created_at.format("D:%Y%m%d%H%M%SZ").to_string()
            ),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).map_err(lopdf::Error::from)?;
        Ok(bytes)
    }

    fn append(&mut self, ops: Vec<Operation>) {
        if let Some(page) = self.pages.last_mut() {
            page.extend(ops);
        }
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// A PDF number rounded to two decimals.
fn real(value: f64) -> Object {
    (((value * 100.0).round() / 100.0) as f32).into()
}

/// Encode text as single-byte Latin-1; other characters become `?`.
fn encode(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

/// Text shown on each page, one entry per `Tj` operation, decoded as Latin-1.
#[cfg(test)]
pub(crate) fn page_texts(bytes: &[u8]) -> Vec<Vec<String>> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
            content
                .operations
                .iter()
                .filter(|op| op.operator == "Tj")
                .filter_map(|op| match op.operands.first() {
                    Some(Object::String(bytes, _)) => {
                        Some(bytes.iter().map(|&b| b as char).collect())
                    }
                    _ => None,
                })
                .collect()
        })
        .collect()
}
