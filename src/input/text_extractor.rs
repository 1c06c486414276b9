//! Text extraction from various file formats

use crate::error::{Result, ResumeScreenerError};
use crate::input::ocr::TesseractOcr;
use pulldown_cmark::{Event, Parser, Tag};
use quick_xml::events::{BytesStart, Event as XmlEvent};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use std::io::{Cursor, Read};
use std::path::Path;
use tokio::fs;

/// How a document's text was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtractionMethod {
    PdfTextLayer,
    Ocr,
    Docx,
    PlainText,
    Markdown,
}

impl std::fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ExtractionMethod::PdfTextLayer => "pdf text layer",
            ExtractionMethod::Ocr => "ocr",
            ExtractionMethod::Docx => "docx",
            ExtractionMethod::PlainText => "plain text",
            ExtractionMethod::Markdown => "markdown",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone)]
pub struct ExtractedText {
    pub text: String,
    pub method: ExtractionMethod,
}

impl ExtractedText {
    fn new(text: String, method: ExtractionMethod) -> Self {
        Self { text, method }
    }
}

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<ExtractedText>> + Send;
}

/// PDF text layer, with an optional OCR pass for image-only documents
pub struct PdfExtractor {
    ocr: Option<TesseractOcr>,
}

impl PdfExtractor {
    pub fn new() -> Self {
        Self { ocr: None }
    }

    pub fn with_ocr(ocr: TesseractOcr) -> Self {
        Self { ocr: Some(ocr) }
    }

    async fn extract_text_layer(path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;
        let display = path.display().to_string();

        // pdf-extract panics on some malformed inputs; a panicking blocking
        // task surfaces here as a JoinError instead of unwinding the batch.
        let parsed = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|e| ResumeScreenerError::PdfExtraction(format!("PDF parser aborted on '{}': {}", display, e)))?;

        parsed.map_err(|e| {
            ResumeScreenerError::PdfExtraction(format!("Failed to extract text from PDF '{}': {}", display, e))
        })
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<ExtractedText> {
        let text = Self::extract_text_layer(path).await?;

        if text.trim().is_empty() {
            if let Some(ocr) = &self.ocr {
                let recognized = ocr.recognize_pdf(path).await?;
                return Ok(ExtractedText::new(recognized, ExtractionMethod::Ocr));
            }
        }

        Ok(ExtractedText::new(text, ExtractionMethod::PdfTextLayer))
    }
}

/// WordprocessingML (`.docx`) documents
pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    async fn extract(&self, path: &Path) -> Result<ExtractedText> {
        let bytes = fs::read(path).await?;
        let text = docx_text(&bytes).map_err(|e| match e {
            ResumeScreenerError::DocxExtraction(msg) => {
                ResumeScreenerError::DocxExtraction(format!("'{}': {}", path.display(), msg))
            }
            other => other,
        })?;
        Ok(ExtractedText::new(text, ExtractionMethod::Docx))
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<ExtractedText> {
        let content = fs::read_to_string(path).await?;
        Ok(ExtractedText::new(content, ExtractionMethod::PlainText))
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<ExtractedText> {
        let markdown_content = fs::read_to_string(path).await?;
        Ok(ExtractedText::new(
            markdown_to_text(&markdown_content),
            ExtractionMethod::Markdown,
        ))
    }
}

/// Strip markdown syntax, keeping one line per block
pub fn markdown_to_text(markdown: &str) -> String {
    let mut text = String::new();

    for event in Parser::new(markdown) {
        match event {
            Event::Text(content) | Event::Code(content) => text.push_str(&content),
            Event::SoftBreak | Event::HardBreak => text.push('\n'),
            Event::End(Tag::Paragraph) | Event::End(Tag::Heading(..)) | Event::End(Tag::Item) => {
                text.push('\n')
            }
            _ => {}
        }
    }

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Body paragraphs first, then table cells row by row, newline-joined.
/// A cell spanning several grid columns is repeated once per column and a
/// vertically merged continuation repeats the cell above it.
pub fn docx_text(bytes: &[u8]) -> Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive.by_name("word/document.xml")?.read_to_string(&mut xml)?;

    let body = parse_document_xml(&xml)?;
    Ok(body
        .paragraphs
        .into_iter()
        .chain(body.cells)
        .collect::<Vec<_>>()
        .join("\n"))
}

#[derive(Debug, Default)]
struct DocxBody {
    paragraphs: Vec<String>,
    cells: Vec<String>,
}

/// Top-level table cell being read
#[derive(Debug)]
struct OpenCell {
    parts: Vec<String>,
    grid_span: usize,
    continues_above: bool,
}

impl OpenCell {
    fn new() -> Self {
        Self {
            parts: Vec::new(),
            grid_span: 1,
            continues_above: false,
        }
    }

    fn apply_property(&mut self, element: &BytesStart) {
        match element.local_name().as_ref() {
            b"gridSpan" => {
                self.grid_span = val_attribute(element)
                    .and_then(|val| val.parse().ok())
                    .unwrap_or(1)
                    .max(1);
            }
            b"vMerge" => {
                self.continues_above = val_attribute(element).map_or(true, |val| val != "restart");
            }
            _ => {}
        }
    }
}

/// Grid-column texts of the current and previous row of one table
#[derive(Debug, Default)]
struct TableGrid {
    above: Vec<String>,
    row: Vec<String>,
}

impl TableGrid {
    fn close_cell(&mut self, cell: OpenCell, cells: &mut Vec<String>) {
        let text = if cell.continues_above {
            self.above.get(self.row.len()).cloned().unwrap_or_default()
        } else {
            cell.parts.join("\n")
        };
        for _ in 0..cell.grid_span {
            cells.push(text.clone());
            self.row.push(text.clone());
        }
    }

    fn close_row(&mut self) {
        self.above = std::mem::take(&mut self.row);
    }
}

fn val_attribute(element: &BytesStart) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == b"val")
        .and_then(|attr| attr.unescape_value().ok().map(|val| val.into_owned()))
}

fn ends_with(stack: &[String], suffix: &[&str]) -> bool {
    stack.len() >= suffix.len()
        && stack[stack.len() - suffix.len()..]
            .iter()
            .zip(suffix)
            .all(|(name, expected)| name == expected)
}

fn is_body_paragraph(stack: &[String]) -> bool {
    ends_with(stack, &["body"])
}

fn is_cell_paragraph(stack: &[String]) -> bool {
    ends_with(stack, &["body", "tbl", "tr", "tc"])
}

fn is_top_level_row(stack: &[String]) -> bool {
    ends_with(stack, &["body", "tbl"])
}

fn is_top_level_cell(stack: &[String]) -> bool {
    ends_with(stack, &["body", "tbl", "tr"])
}

fn is_cell_property(stack: &[String]) -> bool {
    ends_with(stack, &["body", "tbl", "tr", "tc", "tcPr"])
}

/// Only runs owned by the open paragraph count; text boxes nest their own `w:p`.
fn in_own_run(stack: &[String], paragraph_depth: usize) -> bool {
    let inner = match stack.get(paragraph_depth + 1..) {
        Some(inner) => inner,
        None => return false,
    };
    inner.last().map(String::as_str) == Some("r") && !inner.iter().any(|name| name == "p")
}

fn parse_document_xml(xml: &str) -> Result<DocxBody> {
    let mut reader = Reader::from_str(xml);
    let mut body = DocxBody::default();
    let mut stack: Vec<String> = Vec::new();
    let mut paragraph: Option<String> = None;
    let mut paragraph_depth = 0;
    let mut grid = TableGrid::default();
    let mut cell: Option<OpenCell> = None;
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            XmlEvent::Start(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                match name.as_str() {
                    "p" if is_body_paragraph(&stack) || is_cell_paragraph(&stack) => {
                        paragraph = Some(String::new());
                        paragraph_depth = stack.len();
                    }
                    "tbl" if is_body_paragraph(&stack) => grid = TableGrid::default(),
                    "tc" if is_top_level_cell(&stack) => cell = Some(OpenCell::new()),
                    "t" if paragraph.is_some() => in_text = in_own_run(&stack, paragraph_depth),
                    _ if is_cell_property(&stack) => {
                        if let Some(open) = cell.as_mut() {
                            open.apply_property(&e);
                        }
                    }
                    _ => {}
                }
                stack.push(name);
            }
            XmlEvent::Empty(e) => match e.local_name().as_ref() {
                b"p" if is_body_paragraph(&stack) => body.paragraphs.push(String::new()),
                b"p" if is_cell_paragraph(&stack) => {
                    if let Some(open) = cell.as_mut() {
                        open.parts.push(String::new());
                    }
                }
                b"tab" if paragraph.is_some() && in_own_run(&stack, paragraph_depth) => {
                    if let Some(text) = paragraph.as_mut() {
                        text.push('\t');
                    }
                }
                b"br" | b"cr" if paragraph.is_some() && in_own_run(&stack, paragraph_depth) => {
                    if let Some(text) = paragraph.as_mut() {
                        text.push('\n');
                    }
                }
                _ if is_cell_property(&stack) => {
                    if let Some(open) = cell.as_mut() {
                        open.apply_property(&e);
                    }
                }
                _ => {}
            },
            XmlEvent::Text(e) if in_text => {
                if let Some(text) = paragraph.as_mut() {
                    text.push_str(&e.unescape()?);
                }
            }
            XmlEvent::End(e) => {
                stack.pop();
                match e.local_name().as_ref() {
                    b"t" => in_text = false,
                    b"p" if is_body_paragraph(&stack) => {
                        if let Some(text) = paragraph.take() {
                            body.paragraphs.push(text);
                        }
                    }
                    b"p" if is_cell_paragraph(&stack) => {
                        if let (Some(text), Some(open)) = (paragraph.take(), cell.as_mut()) {
                            open.parts.push(text);
                        }
                    }
                    b"tc" if is_top_level_cell(&stack) => {
                        if let Some(open) = cell.take() {
                            grid.close_cell(open, &mut body.cells);
                        }
                    }
                    b"tr" if is_top_level_row(&stack) => grid.close_row(),
                    _ => {}
                }
            }
            XmlEvent::Eof => break,
            _ => {}
        }
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr><w:r><w:t>Jane Roe</w:t></w:r></w:p>
    <w:p><w:r><w:t xml:space="preserve">Python </w:t></w:r><w:r><w:t>&amp; SQL</w:t></w:r></w:p>
    <w:tbl>
      <w:tr>
        <w:tc><w:p><w:r><w:t>Skills</w:t></w:r></w:p></w:tc>
        <w:tc><w:p><w:r><w:t>Django</w:t></w:r></w:p><w:p><w:r><w:t>AWS</w:t></w:r></w:p></w:tc>
      </w:tr>
      <w:tr>
        <w:tc><w:p><w:r><w:t>Years</w:t><w:tab/><w:t>6</w:t></w:r></w:p></w:tc>
      </w:tr>
    </w:tbl>
    <w:p><w:r><w:t>References on request</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

    #[test]
    fn test_paragraphs_then_cells() {
        let body = parse_document_xml(DOCUMENT_XML).unwrap();
        assert_eq!(
            body.paragraphs,
            vec!["Jane Roe", "Python & SQL", "References on request"]
        );
        assert_eq!(body.cells, vec!["Skills", "Django\nAWS", "Years\t6"]);
    }

    #[test]
    fn test_merged_cells_repeat_per_grid_column() {
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>
  <w:tbl>
    <w:tr>
      <w:tc><w:tcPr><w:gridSpan w:val="2"/></w:tcPr><w:p><w:r><w:t>Python</w:t></w:r></w:p></w:tc>
      <w:tc><w:tcPr><w:vMerge w:val="restart"/></w:tcPr><w:p><w:r><w:t>SQL</w:t></w:r></w:p></w:tc>
    </w:tr>
    <w:tr>
      <w:tc><w:p><w:r><w:t>Go</w:t></w:r></w:p></w:tc>
      <w:tc><w:p><w:r><w:t>Rust</w:t></w:r></w:p></w:tc>
      <w:tc><w:tcPr><w:vMerge/></w:tcPr><w:p/></w:tc>
    </w:tr>
    <w:tr>
      <w:tc><w:p/></w:tc>
      <w:tc><w:p/></w:tc>
      <w:tc><w:tcPr><w:vMerge w:val="continue"/></w:tcPr><w:p/></w:tc>
    </w:tr>
  </w:tbl>
</w:body></w:document>"#;

        let body = parse_document_xml(xml).unwrap();
        assert_eq!(
            body.cells,
            vec!["Python", "Python", "SQL", "Go", "Rust", "SQL", "", "", "SQL"]
        );
    }

    #[test]
    fn test_invalid_package_is_docx_error() {
        let err = docx_text(b"this is not a zip archive").unwrap_err();
        assert!(matches!(err, ResumeScreenerError::DocxExtraction(_)));
    }

    #[test]
    fn test_markdown_to_text() {
        let text = markdown_to_text("# Senior Developer\n\n- **Python**\n- `SQL`\n\nMinimum 5 years.");
        assert_eq!(text, "Senior Developer\nPython\nSQL\nMinimum 5 years.");
    }
}
