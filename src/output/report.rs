//! Screening report structures

use crate::processing::requirement::JobRequirement;
use crate::processing::screener::{RankedCandidate, RejectedResume, SkippedResume};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Everything one batch produced, ready for a formatter
#[derive(Debug, Clone, Serialize)]
pub struct ScreeningReport {
    /// Criteria the batch was screened against
    pub requirement: JobRequirement,

    /// Qualified resumes, best first
    pub candidates: Vec<RankedCandidate>,

    /// Resumes missing at least one mandatory keyword
    pub rejected: Vec<RejectedResume>,

    /// Resumes that produced no usable text
    pub skipped: Vec<SkippedResume>,

    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub processing_time_ms: u64,
    pub files_considered: usize,
    pub version: String,
}

impl ReportMetadata {
    pub fn new(files_considered: usize, processing_time_ms: u64) -> Self {
        Self {
            generated_at: Utc::now(),
            processing_time_ms,
            files_considered,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl ScreeningReport {
    pub fn has_candidates(&self) -> bool {
        !self.candidates.is_empty()
    }

    /// Candidates paired with their 1-based rank
    pub fn ranked(&self) -> impl Iterator<Item = (usize, &RankedCandidate)> {
        self.candidates.iter().enumerate().map(|(i, c)| (i + 1, c))
    }
}
