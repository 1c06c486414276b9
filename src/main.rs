//! Resume screener: rank PDF and DOCX resumes against job requirements

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use resume_screener::cli::{self, Cli, Commands, ConfigAction};
use resume_screener::config::{Config, OutputFormat};
use resume_screener::input::InputManager;
use resume_screener::output::formatter::{
    copy_ranked_resumes, report_destination, save_report_to_file, ReportGenerator,
};
use resume_screener::processing::analyzer::ResumeAnalyzer;
use resume_screener::processing::requirement::JobRequirement;
use resume_screener::processing::screener::{collect_resume_paths, Screener};
use resume_screener::{Result, ResumeScreenerError};
use std::path::{Path, PathBuf};
use std::process;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Load configuration
    let loaded = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Execute command
    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, mut config: Config, config_path: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Screen {
            resumes,
            mandatory,
            optional,
            min_experience,
            job,
            job_file,
            output,
            save,
            copy_to,
            detailed,
            no_ocr,
        } => {
            info!("Starting resume screening");

            let output_format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(ResumeScreenerError::InvalidInput)?,
                None => config.output.format.clone(),
            };

            if no_ocr {
                config.extraction.enable_ocr = false;
            }

            let description = match (job, job_file) {
                (Some(text), _) => text,
                (None, Some(path)) => read_job_description(&path).await?,
                (None, None) => String::new(),
            };

            let requirement = JobRequirement::from_inputs(description, &mandatory, &optional, &min_experience)?;
            let files = collect_resume_paths(&resumes)?;
            let console = output_format == OutputFormat::Console;

            if console {
                println!("🚀 Resume screening");
                println!("📂 Resumes: {}", files.len());
                println!("✅ Mandatory: {}", requirement.mandatory().join(", "));
                if !requirement.optional().is_empty() {
                    println!("➕ Optional: {}", requirement.optional().join(", "));
                }
                if !config.extraction.enable_ocr {
                    println!("⚠️  OCR fallback disabled");
                }
                println!();
            }

            let screener = Screener::new(requirement, &config)?;

            let progress_bar = if console && !files.is_empty() {
                let pb = ProgressBar::new(files.len() as u64);
                pb.set_style(
                    ProgressStyle::default_bar()
                        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} resumes {msg}")
                        .unwrap()
                        .progress_chars("#>-"),
                );
                Some(pb)
            } else {
                None
            };

            let report = screener.screen(&files, progress_bar.as_ref()).await;

            if let Some(pb) = &progress_bar {
                pb.finish_and_clear();
            }

            let generator = ReportGenerator::from_config(&config.output, detailed);
            let rendered = generator.generate_report(&report, &output_format)?;

            match &save {
                Some(path) => {
                    let destination = report_destination(path, &output_format);
                    save_report_to_file(&rendered, &destination)?;
                    println!("💾 Report saved to {}", destination.display());
                }
                None => println!("{}", rendered),
            }

            if let Some(dir) = copy_to {
                let copied = copy_ranked_resumes(&report, &dir)?;
                println!("📁 Copied {} resume(s) to {}", copied.len(), dir.display());
            }
        }

        Commands::Extract { file, no_ocr } => {
            if no_ocr {
                config.extraction.enable_ocr = false;
            }

            let input_manager = InputManager::from_config(&config.extraction);
            let document = input_manager.load_resume(&file).await?;

            println!("📄 {} ({})", document.file_name, document.method);
            println!("{} characters\n", document.text.chars().count());
            println!("{}", document.text);
        }

        Commands::Experience { file } => {
            let input_manager = InputManager::from_config(&config.extraction);
            let document = input_manager.load_resume(&file).await?;

            let requirement = JobRequirement::new("", Vec::<String>::new(), Vec::<String>::new(), 0.0)?;
            let analyzer = ResumeAnalyzer::new(requirement, &config)?;

            match analyzer.estimate_experience(&document.text) {
                Some(estimate) => {
                    println!("🕒 {}: {:.1} years", document.file_name, estimate.years);
                    println!("   Found by: {}", estimate.source);
                }
                None => println!("🕒 {}: no experience found", document.file_name),
            }
        }

        Commands::Config { action } => {
            match action {
                Some(ConfigAction::Show) | None => {
                    println!("⚙️  Current Configuration\n");
                    println!("Scoring:");
                    println!("  Mandatory weight: {:.1}", config.scoring.mandatory_weight);
                    println!("  Optional weight: {:.1}", config.scoring.optional_weight);
                    println!("  Experience bonus rate: {:.0}%", config.scoring.experience_bonus_rate * 100.0);
                    println!("  Experience ratio cap: {:.1}", config.scoring.experience_ratio_cap);
                    println!("\nExtraction:");
                    println!("  OCR fallback: {}", if config.extraction.enable_ocr { "enabled" } else { "disabled" });
                    println!("  pdftoppm: {}", config.extraction.pdftoppm_path);
                    println!("  tesseract: {}", config.extraction.tesseract_path);
                    println!("  OCR resolution: {} dpi", config.extraction.ocr_dpi);
                    println!("  OCR timeout: {}s", config.extraction.ocr_timeout_secs);
                    println!("  Context window: {} chars", config.extraction.context_window);
                    println!("\nOutput:");
                    println!("  Format: {:?}", config.output.format);
                    println!("  Colors: {}", config.output.color_output);
                    println!("  Snippets per keyword: {}", config.output.snippets_per_keyword);
                }

                Some(ConfigAction::Reset) => {
                    println!("🔄 Resetting configuration to defaults...");
                    let default_config = Config::default();
                    match &config_path {
                        Some(path) => default_config.save_to(path)?,
                        None => default_config.save()?,
                    }
                    println!("✅ Configuration reset successfully!");
                }

                Some(ConfigAction::Path) => {
                    let path = config_path.unwrap_or_else(Config::config_path);
                    println!("{}", path.display());
                }
            }
        }
    }

    Ok(())
}

/// Job description text from a `.txt` or `.md` file
async fn read_job_description(path: &Path) -> Result<String> {
    cli::validate_file_extension(path, &["txt", "md"])
        .map_err(|e| ResumeScreenerError::InvalidInput(format!("Job description file: {}", e)))?;

    let input_manager = InputManager::new();
    Ok(input_manager.extract_text(path).await?.text)
}
