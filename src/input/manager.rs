//! Input manager for handling different file types

use crate::config::ExtractionConfig;
use crate::error::{Result, ResumeScreenerError};
use crate::input::file_detector::FileType;
use crate::input::ocr::TesseractOcr;
use crate::input::text_extractor::{
    DocxExtractor, ExtractedText, MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor,
};
use crate::processing::document::ResumeDocument;
use log::{debug, info};
use std::path::Path;

pub struct InputManager {
    pdf_extractor: PdfExtractor,
}

impl InputManager {
    /// Manager without OCR; image-only PDFs come back empty
    pub fn new() -> Self {
        Self {
            pdf_extractor: PdfExtractor::new(),
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        let pdf_extractor = if config.enable_ocr {
            PdfExtractor::with_ocr(TesseractOcr::from_config(config))
        } else {
            PdfExtractor::new()
        };

        Self { pdf_extractor }
    }

    /// Extract raw text from any supported file, resume or job description
    pub async fn extract_text(&self, path: &Path) -> Result<ExtractedText> {
        if !path.exists() {
            return Err(ResumeScreenerError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let file_type = self.detect_file_type(path)?;

        match file_type {
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                self.pdf_extractor.extract(path).await
            }
            FileType::Docx => {
                info!("Extracting text from Word document: {}", path.display());
                DocxExtractor.extract(path).await
            }
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await
            }
            FileType::Unknown => Err(ResumeScreenerError::UnsupportedFormat(format!(
                "Unsupported file type for: {}",
                path.display()
            ))),
        }
    }

    /// Extract and normalize a resume; empty text is reported as `EmptyDocument`
    pub async fn load_resume(&self, path: &Path) -> Result<ResumeDocument> {
        let file_type = self.detect_file_type(path)?;
        if !file_type.is_resume() {
            return Err(ResumeScreenerError::UnsupportedFormat(format!(
                "Not a resume document (pdf, docx, doc): {}",
                path.display()
            )));
        }

        let extracted = self.extract_text(path).await?;
        let document = ResumeDocument::new(path, extracted);

        if document.is_blank() {
            return Err(ResumeScreenerError::EmptyDocument(path.display().to_string()));
        }

        debug!(
            "Loaded {} ({} characters via {})",
            document.file_name,
            document.text.chars().count(),
            document.method
        );
        Ok(document)
    }

    fn detect_file_type(&self, path: &Path) -> Result<FileType> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| ResumeScreenerError::InvalidInput(
                format!("File has no extension: {}", path.display())
            ))?;

        Ok(FileType::from_extension(extension))
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}
