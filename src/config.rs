//! Configuration management for the resume screener

use crate::error::{Result, ResumeScreenerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub scoring: ScoringConfig,
    pub extraction: ExtractionConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Points per mandatory keyword occurrence
    pub mandatory_weight: f64,
    /// Points per optional keyword occurrence
    pub optional_weight: f64,
    /// Fraction of the keyword score granted as experience bonus
    pub experience_bonus_rate: f64,
    /// Upper bound on experience / minimum
    pub experience_ratio_cap: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub enable_ocr: bool,
    pub pdftoppm_path: String,
    pub tesseract_path: String,
    pub ocr_dpi: u32,
    pub ocr_timeout_secs: u64,
    /// Characters captured on each side of a keyword match
    pub context_window: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
    pub snippets_per_keyword: usize,
    pub snippet_max_chars: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
    Html,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            mandatory_weight: 3.0,
            optional_weight: 1.0,
            experience_bonus_rate: 0.2,
            experience_ratio_cap: 1.2,
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            enable_ocr: true,
            pdftoppm_path: "pdftoppm".to_string(),
            tesseract_path: "tesseract".to_string(),
            ocr_dpi: 300,
            ocr_timeout_secs: 120,
            context_window: 50,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            color_output: true,
            snippets_per_keyword: 2,
            snippet_max_chars: 100,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            extraction: ExtractionConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Load from the default location, writing defaults on first run
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| ResumeScreenerError::Configuration(format!("Failed to parse config '{}': {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ResumeScreenerError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-screener")
            .join("config.toml")
    }

    /// Reject weights that would make scores meaningless
    pub fn validate(&self) -> Result<()> {
        let scoring = &self.scoring;
        let weights = [
            ("scoring.mandatory_weight", scoring.mandatory_weight),
            ("scoring.optional_weight", scoring.optional_weight),
            ("scoring.experience_bonus_rate", scoring.experience_bonus_rate),
            ("scoring.experience_ratio_cap", scoring.experience_ratio_cap),
        ];

        for (key, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(ResumeScreenerError::Configuration(format!(
                    "{} must be a non-negative number, got {}",
                    key, value
                )));
            }
        }

        if self.extraction.ocr_dpi == 0 {
            return Err(ResumeScreenerError::Configuration(
                "extraction.ocr_dpi must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
