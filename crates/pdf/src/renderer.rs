//! Single-page PDF rendering of a report.
//!
//! The page is laid out top-down on a fixed line grid: a centered bold
//! title, the three money lines, a bold conclusions heading and the wrapped
//! recommendation.

use crate::fonts::{to_win_ansi, StandardFont};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use report_core::{Error, ReportContent, ReportFormat, ReportRenderer, Result};

/// A4 in points.
const PAGE_WIDTH: f32 = 595.28;
const PAGE_HEIGHT: f32 = 841.89;

/// 10 mm page margin.
const MARGIN: f32 = 28.35;
/// Height of one text line (10 mm).
const LINE_HEIGHT: f32 = 28.35;
/// Gap between the text and the edge of its line box (1 mm).
const CELL_PADDING: f32 = 2.835;

const TITLE_SIZE: f32 = 16.0;
const BODY_SIZE: f32 = 12.0;

/// One positioned run of text, baseline origin in PDF coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub font: StandardFont,
    pub size: f32,
    pub x: f32,
    pub y: f32,
    pub text: String,
}

/// Tracks the current line position from the top of the page.
struct Cursor {
    top: f32,
    runs: Vec<TextRun>,
}

impl Cursor {
    fn new() -> Self {
        Self {
            top: MARGIN,
            runs: Vec::new(),
        }
    }

    fn baseline(&self, size: f32) -> f32 {
        PAGE_HEIGHT - (self.top + LINE_HEIGHT / 2.0 + 0.3 * size)
    }

    fn line(&mut self, font: StandardFont, size: f32, text: &str) {
        let y = self.baseline(size);
        self.runs.push(TextRun {
            font,
            size,
            x: MARGIN + CELL_PADDING,
            y,
            text: text.to_string(),
        });
        self.top += LINE_HEIGHT;
    }

    fn centered(&mut self, font: StandardFont, size: f32, text: &str) {
        let y = self.baseline(size);
        let width = font.text_width(text, size);
        self.runs.push(TextRun {
            font,
            size,
            x: ((PAGE_WIDTH - width) / 2.0).max(MARGIN),
            y,
            text: text.to_string(),
        });
        self.top += LINE_HEIGHT;
    }

    fn skip(&mut self) {
        self.top += LINE_HEIGHT;
    }
}

/// Renders a report as a one-page PDF.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfRenderer;

impl PdfRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Position every piece of text on the page.
    pub fn layout(&self, content: &ReportContent) -> Vec<TextRun> {
        let mut cursor = Cursor::new();

        cursor.centered(StandardFont::HelveticaBold, TITLE_SIZE, &content.pdf_title);
        cursor.skip();

        cursor.line(StandardFont::Helvetica, BODY_SIZE, &content.total_income_line);
        cursor.line(StandardFont::Helvetica, BODY_SIZE, &content.actual_income_line);
        cursor.line(StandardFont::Helvetica, BODY_SIZE, &content.refund_line);
        cursor.skip();

        cursor.line(StandardFont::HelveticaBold, BODY_SIZE, &content.conclusions_heading);
        let max_width = PAGE_WIDTH - 2.0 * (MARGIN + CELL_PADDING);
        for line in StandardFont::Helvetica.wrap(content.recommendation.as_str(), BODY_SIZE, max_width) {
            cursor.line(StandardFont::Helvetica, BODY_SIZE, &line);
        }

        cursor.runs
    }

    fn page_content(&self, runs: &[TextRun]) -> Content {
        let mut operations = Vec::with_capacity(runs.len() * 4);
        for run in runs {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new(
                "Tf",
                vec![run.font.resource_name().into(), run.size.into()],
            ));
            operations.push(Operation::new("Td", vec![run.x.into(), run.y.into()]));
            operations.push(Operation::new(
                "Tj",
                vec![Object::String(to_win_ansi(&run.text), StringFormat::Literal)],
            ));
            operations.push(Operation::new("ET", vec![]));
        }
        Content { operations }
    }

    fn build_document(&self, content: &ReportContent) -> Result<Document> {
        let runs = self.layout(content);
        let encoded = self
            .page_content(&runs)
            .encode()
            .map_err(|e| Error::PdfError(format!("Failed to encode page content: {}", e)))?;

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut fonts = lopdf::Dictionary::new();
        for font in [StandardFont::Helvetica, StandardFont::HelveticaBold] {
            let font_id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(font.resource_name(), font_id);
        }
        let resources_id = doc.add_object(dictionary! { "Font" => fonts });

        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );

        let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
        doc.trailer.set("Root", catalog_id);

        let info_id = doc.add_object(dictionary! {
            "Title" => Object::String(to_win_ansi(&content.pdf_title), StringFormat::Literal),
            "Producer" => Object::string_literal("report-gen"),
        });
        doc.trailer.set("Info", info_id);

        Ok(doc)
    }
}

impl ReportRenderer for PdfRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Pdf
    }

    fn render(&self, content: &ReportContent) -> Result<Vec<u8>> {
        let mut doc = self.build_document(content)?;
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| Error::PdfError(format!("Failed to write PDF: {}", e)))?;
        log::debug!("Rendered PDF of {} bytes", bytes.len());
        Ok(bytes)
    }
}
