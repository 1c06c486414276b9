//! Error handling for the resume screener

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResumeScreenerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("DOCX extraction error: {0}")]
    DocxExtraction(String),

    #[error("OCR error: {0}")]
    Ocr(String),

    #[error("Document contains no text: {0}")]
    EmptyDocument(String),

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid job requirement: {0}")]
    InvalidRequirement(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, ResumeScreenerError>;

impl From<zip::result::ZipError> for ResumeScreenerError {
    fn from(err: zip::result::ZipError) -> Self {
        ResumeScreenerError::DocxExtraction(format!("not a valid OOXML package: {}", err))
    }
}

impl From<quick_xml::Error> for ResumeScreenerError {
    fn from(err: quick_xml::Error) -> Self {
        ResumeScreenerError::DocxExtraction(format!("malformed document.xml: {}", err))
    }
}
