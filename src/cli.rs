//! CLI interface for the resume screener

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-screener")]
#[command(about = "Screen and rank resumes against job requirements")]
#[command(long_about = "Extract text from PDF and DOCX resumes, check mandatory keywords, estimate years of experience and rank the qualified candidates")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Screen a batch of resumes and rank the qualified ones
    Screen {
        /// Resume files or directories (PDF, DOCX, DOC)
        #[arg(required = true)]
        resumes: Vec<PathBuf>,

        /// Comma-separated keywords every candidate must mention
        #[arg(short, long)]
        mandatory: String,

        /// Comma-separated keywords that raise the score
        #[arg(short = 'p', long, default_value = "")]
        optional: String,

        /// Minimum years of experience
        #[arg(short = 'e', long)]
        min_experience: String,

        /// Job description text
        #[arg(short, long, conflicts_with = "job_file")]
        job: Option<String>,

        /// Job description file (TXT, MD)
        #[arg(long)]
        job_file: Option<PathBuf>,

        /// Output format: console, json, markdown, html
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to a file, or into a directory under a generated name
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Copy ranked resumes into this directory
        #[arg(long)]
        copy_to: Option<PathBuf>,

        /// Include rejected and skipped resumes and every snippet
        #[arg(short, long)]
        detailed: bool,

        /// Disable the OCR fallback for scanned PDFs
        #[arg(long)]
        no_ocr: bool,
    },

    /// Print the normalized text of one resume
    Extract {
        /// Resume file
        file: PathBuf,

        /// Disable the OCR fallback for scanned PDFs
        #[arg(long)]
        no_ocr: bool,
    },

    /// Estimate years of experience in one resume
    Experience {
        /// Resume file
        file: PathBuf,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        "html" => Ok(OutputFormat::Html),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown, html", format)),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
