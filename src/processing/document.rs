//! Resume document produced by the extraction stage

use crate::input::text_extractor::{ExtractedText, ExtractionMethod};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeDocument {
    pub path: PathBuf,
    pub file_name: String,
    /// Lowercased full text
    pub text: String,
    pub method: ExtractionMethod,
}

impl ResumeDocument {
    pub fn new(path: &Path, extracted: ExtractedText) -> Self {
        Self::from_text(path, &extracted.text, extracted.method)
    }

    pub fn from_text(path: &Path, text: &str, method: ExtractionMethod) -> Self {
        Self {
            path: path.to_path_buf(),
            file_name: display_name(path),
            text: text.to_lowercase(),
            method,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Base name of a path, falling back to the full path
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
