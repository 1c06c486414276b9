//! Per-resume analysis: keywords, experience and score

use crate::config::Config;
use crate::error::Result;
use crate::processing::document::ResumeDocument;
use crate::processing::experience::{ExperienceEstimate, ExperienceExtractor};
use crate::processing::keywords::KeywordAnalyzer;
use crate::processing::requirement::JobRequirement;
use crate::processing::scoring::{ScoreBreakdown, Scorer};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub file_name: String,
    pub missing_mandatory: Vec<String>,
    pub keyword_counts: BTreeMap<String, usize>,
    pub keyword_contexts: BTreeMap<String, Vec<String>>,
    pub experience: Option<ExperienceEstimate>,
    pub score: ScoreBreakdown,
}

impl AnalysisResult {
    /// Every mandatory keyword was found at least once
    pub fn is_qualified(&self) -> bool {
        self.missing_mandatory.is_empty()
    }

    pub fn experience_years(&self) -> Option<f64> {
        self.experience.as_ref().map(|e| e.years)
    }

    pub fn total_score(&self) -> f64 {
        self.score.total
    }
}

/// Runs the analysis stages for one requirement; build once per batch
pub struct ResumeAnalyzer {
    requirement: JobRequirement,
    keywords: KeywordAnalyzer,
    experience: ExperienceExtractor,
    scorer: Scorer,
    reference_date: Option<NaiveDate>,
}

impl ResumeAnalyzer {
    pub fn new(requirement: JobRequirement, config: &Config) -> Result<Self> {
        let keywords = KeywordAnalyzer::new(&requirement, config.extraction.context_window)?;

        Ok(Self {
            requirement,
            keywords,
            experience: ExperienceExtractor::new(),
            scorer: Scorer::new(config.scoring.clone()),
            reference_date: None,
        })
    }

    /// Pin the date that "present" resolves to
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    pub fn requirement(&self) -> &JobRequirement {
        &self.requirement
    }

    pub fn analyze(&self, document: &ResumeDocument) -> AnalysisResult {
        self.analyze_normalized(&document.file_name, &document.text)
    }

    /// Analyze raw text; it is lowercased first
    pub fn analyze_text(&self, file_name: &str, text: &str) -> AnalysisResult {
        self.analyze_normalized(file_name, &text.to_lowercase())
    }

    pub fn estimate_experience(&self, text: &str) -> Option<ExperienceEstimate> {
        let today = self.reference_date.unwrap_or_else(|| Local::now().date_naive());
        self.experience.extract_at(text, today)
    }

    fn analyze_normalized(&self, file_name: &str, text: &str) -> AnalysisResult {
        let keywords = self.keywords.analyze(text);
        let experience = self.estimate_experience(text);
        let score = self.scorer.score(
            &self.requirement,
            &keywords.counts,
            experience.as_ref().map(|e| e.years),
        );

        log::debug!(
            "{}: score {:.2}, experience {:?}, missing {:?}",
            file_name,
            score.total,
            experience.as_ref().map(|e| e.years),
            keywords.missing_mandatory
        );

        AnalysisResult {
            file_name: file_name.to_string(),
            missing_mandatory: keywords.missing_mandatory,
            keyword_counts: keywords.counts,
            keyword_contexts: keywords.contexts,
            experience,
            score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> ResumeAnalyzer {
        let requirement = JobRequirement::new(
            "Senior Python Developer",
            ["python", "sql"],
            ["django", "aws"],
            5.0,
        )
        .unwrap();
        ResumeAnalyzer::new(requirement, &Config::default())
            .unwrap()
            .with_reference_date(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
    }

    #[test]
    fn test_qualified_resume() {
        let result = analyzer().analyze_text(
            "jane.pdf",
            "Python developer. 6 years experience with SQL, Python and Django.",
        );

        assert!(result.is_qualified());
        assert_eq!(result.keyword_counts["python"], 2);
        assert_eq!(result.keyword_counts["sql"], 1);
        assert_eq!(result.keyword_counts["django"], 1);
        assert_eq!(result.experience_years(), Some(6.0));
        // (2 + 1) * 3 + 1 = 10, bonus min(6/5, 1.2) * 10 * 0.2 = 2.4
        assert!((result.total_score() - 12.4).abs() < 1e-9);
    }

    #[test]
    fn test_missing_mandatory_still_scored() {
        let result = analyzer().analyze_text("john.docx", "python python python, no databases");

        assert!(!result.is_qualified());
        assert_eq!(result.missing_mandatory, vec!["sql"]);
        assert_eq!(result.total_score(), 9.0);
        assert_eq!(result.experience, None);
    }

    #[test]
    fn test_repeated_mandatory_keyword_counts_twice() {
        let requirement = JobRequirement::from_inputs("", "python, python", "", "1").unwrap();
        let analyzer = ResumeAnalyzer::new(requirement, &Config::default()).unwrap();

        let result = analyzer.analyze_text("dup.pdf", "python python");
        assert!(result.is_qualified());
        assert_eq!(result.score.mandatory, 12.0);
    }

    #[test]
    fn test_empty_text_misses_everything() {
        let result = analyzer().analyze_text("blank.pdf", "");
        assert_eq!(result.missing_mandatory, vec!["python", "sql"]);
        assert_eq!(result.total_score(), 0.0);
    }
}
