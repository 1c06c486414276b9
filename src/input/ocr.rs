//! OCR fallback for scanned PDFs
//!
//! Pages are rasterised with `pdftoppm` (poppler) and each page image is
//! recognised with the `tesseract` CLI.

use crate::config::ExtractionConfig;
use crate::error::{Result, ResumeScreenerError};
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;
use tokio::process::Command;

pub struct TesseractOcr {
    pdftoppm_path: String,
    tesseract_path: String,
    dpi: u32,
    timeout: Duration,
}

impl TesseractOcr {
    pub fn new(pdftoppm_path: impl Into<String>, tesseract_path: impl Into<String>, dpi: u32, timeout: Duration) -> Self {
        Self {
            pdftoppm_path: pdftoppm_path.into(),
            tesseract_path: tesseract_path.into(),
            dpi,
            timeout,
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(
            config.pdftoppm_path.clone(),
            config.tesseract_path.clone(),
            config.ocr_dpi,
            Duration::from_secs(config.ocr_timeout_secs),
        )
    }

    /// Render every page of `pdf` and return the recognised text, one page per line block
    pub async fn recognize_pdf(&self, pdf: &Path) -> Result<String> {
        let scratch = tempfile::TempDir::new()?;
        let prefix = scratch.path().join("page");

        info!("Running OCR fallback for: {}", pdf.display());

        let mut render = Command::new(&self.pdftoppm_path);
        render
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg("-png")
            .arg(pdf)
            .arg(&prefix);
        self.run_tool(&self.pdftoppm_path, render).await?;

        let pages = Self::page_images(scratch.path())?;
        debug!("Rendered {} page image(s) from {}", pages.len(), pdf.display());

        let mut page_texts = Vec::with_capacity(pages.len());
        for page in &pages {
            let mut recognize = Command::new(&self.tesseract_path);
            recognize.arg(page).arg("stdout");
            let output = self.run_tool(&self.tesseract_path, recognize).await?;
            page_texts.push(String::from_utf8_lossy(&output.stdout).into_owned());
        }

        Ok(page_texts.join("\n"))
    }

    async fn run_tool(&self, tool: &str, mut command: Command) -> Result<Output> {
        command.kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| ResumeScreenerError::Ocr(format!("{} timed out after {}s", tool, self.timeout.as_secs())))?
            .map_err(|e| ResumeScreenerError::Ocr(format!("failed to launch {}: {}", tool, e)))?;

        if !output.status.success() {
            return Err(ResumeScreenerError::Ocr(format!(
                "{} exited with {}: {}",
                tool,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(output)
    }

    /// `pdftoppm` zero-pads page numbers, so lexical order is page order
    fn page_images(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut pages: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("png"))
            .collect();
        pages.sort();
        Ok(pages)
    }
}
