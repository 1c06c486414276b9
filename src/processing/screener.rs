//! Batch screening: extract, analyze and rank a set of resumes

use crate::config::Config;
use crate::error::{Result, ResumeScreenerError};
use crate::input::file_detector::is_supported_resume;
use crate::input::InputManager;
use crate::output::report::{ReportMetadata, ScreeningReport};
use crate::processing::analyzer::{AnalysisResult, ResumeAnalyzer};
use crate::processing::document::display_name;
use crate::processing::requirement::JobRequirement;
use indicatif::ProgressBar;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// A resume that contains every mandatory keyword
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub path: PathBuf,
    pub experience_met: bool,
    #[serde(flatten)]
    pub analysis: AnalysisResult,
}

impl RankedCandidate {
    pub fn file_name(&self) -> &str {
        &self.analysis.file_name
    }

    pub fn score(&self) -> f64 {
        self.analysis.total_score()
    }

    pub fn experience(&self) -> Option<f64> {
        self.analysis.experience_years()
    }
}

/// Analyzed but missing at least one mandatory keyword
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedResume {
    pub path: PathBuf,
    pub file_name: String,
    pub missing_mandatory: Vec<String>,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// No text even after the OCR fallback
    EmptyText,
    ExtractionFailed(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::EmptyText => f.write_str("no extractable text"),
            SkipReason::ExtractionFailed(reason) => write!(f, "extraction failed: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedResume {
    pub path: PathBuf,
    pub file_name: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResumeOutcome {
    Ranked(RankedCandidate),
    Rejected(RejectedResume),
    Skipped(SkippedResume),
}

pub struct Screener {
    input: InputManager,
    analyzer: ResumeAnalyzer,
}

impl Screener {
    pub fn new(requirement: JobRequirement, config: &Config) -> Result<Self> {
        Ok(Self {
            input: InputManager::from_config(&config.extraction),
            analyzer: ResumeAnalyzer::new(requirement, config)?,
        })
    }

    pub fn requirement(&self) -> &JobRequirement {
        self.analyzer.requirement()
    }

    /// Extract and analyze one resume; failures become `Skipped`
    pub async fn screen_file(&self, path: &Path) -> ResumeOutcome {
        let file_name = display_name(path);

        let document = match self.input.load_resume(path).await {
            Ok(document) => document,
            Err(e) => {
                let reason = match e {
                    ResumeScreenerError::EmptyDocument(_) => SkipReason::EmptyText,
                    other => SkipReason::ExtractionFailed(other.to_string()),
                };
                warn!("Skipping {}: {}", path.display(), reason);
                return ResumeOutcome::Skipped(SkippedResume {
                    path: path.to_path_buf(),
                    file_name,
                    reason,
                });
            }
        };

        let analysis = self.analyzer.analyze(&document);

        if analysis.is_qualified() {
            let experience_met = self.requirement().experience_met(analysis.experience_years());
            ResumeOutcome::Ranked(RankedCandidate {
                path: path.to_path_buf(),
                experience_met,
                analysis,
            })
        } else {
            debug!("{} is missing {:?}", file_name, analysis.missing_mandatory);
            ResumeOutcome::Rejected(RejectedResume {
                path: path.to_path_buf(),
                file_name,
                score: analysis.total_score(),
                missing_mandatory: analysis.missing_mandatory,
            })
        }
    }

    /// Screen resume files one after another and rank the qualified ones
    pub async fn screen(&self, files: &[PathBuf], progress: Option<&ProgressBar>) -> ScreeningReport {
        let started = Instant::now();
        let mut candidates = Vec::new();
        let mut rejected = Vec::new();
        let mut skipped = Vec::new();

        info!("Screening {} resume(s)", files.len());

        for path in files {
            if let Some(pb) = progress {
                pb.set_message(display_name(path));
            }

            match self.screen_file(path).await {
                ResumeOutcome::Ranked(candidate) => candidates.push(candidate),
                ResumeOutcome::Rejected(resume) => rejected.push(resume),
                ResumeOutcome::Skipped(resume) => skipped.push(resume),
            }

            if let Some(pb) = progress {
                pb.inc(1);
            }
        }

        rank_candidates(&mut candidates);

        info!(
            "{} qualified, {} rejected, {} skipped",
            candidates.len(),
            rejected.len(),
            skipped.len()
        );

        ScreeningReport {
            requirement: self.requirement().clone(),
            candidates,
            rejected,
            skipped,
            metadata: ReportMetadata::new(files.len(), started.elapsed().as_millis() as u64),
        }
    }

    /// Expand directories and filter to resume documents, then screen
    pub async fn screen_paths(&self, inputs: &[PathBuf], progress: Option<&ProgressBar>) -> Result<ScreeningReport> {
        let files = collect_resume_paths(inputs)?;
        if let Some(pb) = progress {
            pb.set_length(files.len() as u64);
        }
        Ok(self.screen(&files, progress).await)
    }
}

/// Score descending, then experience-met first; stable for exact ties
pub fn rank_candidates(candidates: &mut [RankedCandidate]) {
    candidates.sort_by(|a, b| {
        b.score()
            .total_cmp(&a.score())
            .then_with(|| b.experience_met.cmp(&a.experience_met))
    });
}

/// Files are kept in the given order; a directory contributes its direct
/// entries sorted by name. Anything that is not pdf/docx/doc is dropped.
pub fn collect_resume_paths(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let mut entries: Vec<PathBuf> = std::fs::read_dir(input)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| path.is_file())
                .collect();
            entries.sort_by_key(|path| display_name(path));
            files.extend(entries.into_iter().filter(|path| keep_resume(path)));
        } else if input.is_file() {
            if keep_resume(input) {
                files.push(input.clone());
            }
        } else {
            return Err(ResumeScreenerError::InvalidInput(format!(
                "Resume path does not exist: {}",
                input.display()
            )));
        }
    }

    Ok(files)
}

fn keep_resume(path: &Path) -> bool {
    let supported = is_supported_resume(path);
    if !supported {
        debug!("Ignoring non-resume file: {}", path.display());
    }
    supported
}
