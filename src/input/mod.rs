//! Input processing module
//! Handles file detection, text extraction, OCR fallback and input management

pub mod file_detector;
pub mod manager;
pub mod ocr;
pub mod text_extractor;

pub use manager::InputManager;
