//! Weighted keyword + experience scoring

use crate::config::ScoringConfig;
use crate::processing::requirement::JobRequirement;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub mandatory: f64,
    pub optional: f64,
    pub experience_bonus: f64,
    pub total: f64,
}

pub struct Scorer {
    weights: ScoringConfig,
}

impl Scorer {
    pub fn new(weights: ScoringConfig) -> Self {
        Self { weights }
    }

    pub fn score(
        &self,
        requirement: &JobRequirement,
        counts: &BTreeMap<String, usize>,
        experience: Option<f64>,
    ) -> ScoreBreakdown {
        let occurrences = |keywords: &[String]| -> f64 {
            keywords
                .iter()
                .map(|kw| counts.get(kw).copied().unwrap_or(0) as f64)
                .sum()
        };

        let mandatory = occurrences(requirement.mandatory()) * self.weights.mandatory_weight;
        let optional = occurrences(requirement.optional()) * self.weights.optional_weight;
        let experience_bonus = self.experience_bonus(requirement.min_experience(), experience, mandatory + optional);

        ScoreBreakdown {
            mandatory,
            optional,
            experience_bonus,
            total: mandatory + optional + experience_bonus,
        }
    }

    /// Zero below the minimum; otherwise a share of the keyword score scaled
    /// by experience / minimum, capped.
    fn experience_bonus(&self, min_experience: f64, experience: Option<f64>, keyword_score: f64) -> f64 {
        match experience {
            Some(years) if years >= min_experience => {
                let ratio = if min_experience > 0.0 {
                    (years / min_experience).min(self.weights.experience_ratio_cap)
                } else {
                    self.weights.experience_ratio_cap
                };
                ratio * keyword_score * self.weights.experience_bonus_rate
            }
            _ => 0.0,
        }
    }
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requirement(min_experience: f64) -> JobRequirement {
        JobRequirement::new("", ["python", "sql"], ["django"], min_experience).unwrap()
    }

    fn counts(entries: &[(&str, usize)]) -> BTreeMap<String, usize> {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_reference_score() {
        let score = Scorer::default().score(
            &requirement(5.0),
            &counts(&[("python", 2), ("sql", 0), ("django", 1)]),
            Some(6.0),
        );

        assert_eq!(score.mandatory, 6.0);
        assert_eq!(score.optional, 1.0);
        assert!((score.experience_bonus - 1.68).abs() < 1e-9);
        assert!((score.total - 8.68).abs() < 1e-9);
    }

    #[test]
    fn test_bonus_ratio_is_capped() {
        let score = Scorer::default().score(&requirement(5.0), &counts(&[("python", 1)]), Some(50.0));
        assert!((score.experience_bonus - 1.2 * 3.0 * 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_no_bonus_below_minimum_or_unknown() {
        let req = requirement(5.0);
        let c = counts(&[("python", 1), ("sql", 1)]);
        assert_eq!(Scorer::default().score(&req, &c, Some(4.99)).experience_bonus, 0.0);
        assert_eq!(Scorer::default().score(&req, &c, None).experience_bonus, 0.0);
        assert_eq!(Scorer::default().score(&req, &c, None).total, 6.0);
    }

    #[test]
    fn test_zero_minimum_uses_cap() {
        let score = Scorer::default().score(&requirement(0.0), &counts(&[("python", 1)]), Some(0.0));
        assert!((score.experience_bonus - 1.2 * 3.0 * 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_repeated_keyword_scores_each_copy() {
        let req = JobRequirement::from_inputs("", "python, python", "", "1").unwrap();
        let score = Scorer::default().score(&req, &counts(&[("python", 2)]), None);
        assert_eq!(score.mandatory, 12.0);
        assert_eq!(score.total, 12.0);
    }

    #[test]
    fn test_custom_weights() {
        let scorer = Scorer::new(ScoringConfig {
            mandatory_weight: 5.0,
            optional_weight: 2.0,
            experience_bonus_rate: 0.0,
            experience_ratio_cap: 1.2,
        });
        let score = scorer.score(&requirement(1.0), &counts(&[("sql", 2), ("django", 3)]), Some(3.0));
        assert_eq!(score.total, 16.0);
    }
}
