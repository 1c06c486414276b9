//! Job requirement: keyword lists and minimum experience

use crate::error::{Result, ResumeScreenerError};
use serde::Serialize;

/// Immutable screening criteria for one batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobRequirement {
    description: String,
    mandatory: Vec<String>,
    optional: Vec<String>,
    min_experience: f64,
}

impl JobRequirement {
    pub fn new<M, O>(description: impl Into<String>, mandatory: M, optional: O, min_experience: f64) -> Result<Self>
    where
        M: IntoIterator,
        M::Item: AsRef<str>,
        O: IntoIterator,
        O::Item: AsRef<str>,
    {
        if !min_experience.is_finite() || min_experience < 0.0 {
            return Err(ResumeScreenerError::InvalidRequirement(format!(
                "minimum experience must be a non-negative number of years, got {}",
                min_experience
            )));
        }

        Ok(Self {
            description: description.into(),
            mandatory: normalize_keywords(mandatory),
            optional: normalize_keywords(optional),
            min_experience,
        })
    }

    /// Build from raw user input: comma-separated lists and a numeric string
    pub fn from_inputs(description: impl Into<String>, mandatory: &str, optional: &str, min_experience: &str) -> Result<Self> {
        let min_experience = parse_min_experience(min_experience)?;
        Self::new(description, split_keywords(mandatory), split_keywords(optional), min_experience)
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn mandatory(&self) -> &[String] {
        &self.mandatory
    }

    pub fn optional(&self) -> &[String] {
        &self.optional
    }

    pub fn min_experience(&self) -> f64 {
        self.min_experience
    }

    /// Whether an extracted experience value satisfies the minimum
    pub fn experience_met(&self, experience: Option<f64>) -> bool {
        experience.map_or(false, |years| years >= self.min_experience)
    }
}

/// Split a comma-separated keyword list, dropping blank entries
pub fn split_keywords(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|kw| !kw.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn parse_min_experience(value: &str) -> Result<f64> {
    let trimmed = value.trim();
    let years: f64 = trimmed.parse().map_err(|_| {
        ResumeScreenerError::InvalidRequirement(format!(
            "minimum experience must be a number of years, got '{}'",
            trimmed
        ))
    })?;

    if !years.is_finite() || years < 0.0 {
        return Err(ResumeScreenerError::InvalidRequirement(format!(
            "minimum experience must be a non-negative number of years, got '{}'",
            trimmed
        )));
    }

    Ok(years)
}

/// Lowercase, trim and drop blanks. Repeated keywords are kept and each
/// copy is scored.
fn normalize_keywords<I>(keywords: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    keywords
        .into_iter()
        .map(|keyword| keyword.as_ref().trim().to_lowercase())
        .filter(|keyword| !keyword.is_empty())
        .collect()
}
