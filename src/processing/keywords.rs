//! Whole-word keyword matching with context capture

use crate::error::{Result, ResumeScreenerError};
use crate::processing::requirement::JobRequirement;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Literal keyword compiled into a `\b...\b` case-insensitive pattern
pub struct KeywordMatcher {
    keyword: String,
    pattern: Regex,
}

impl KeywordMatcher {
    pub fn new(keyword: &str) -> Result<Self> {
        let pattern = RegexBuilder::new(&format!(r"\b{}\b", regex::escape(keyword)))
            .case_insensitive(true)
            .build()
            .map_err(|e| {
                ResumeScreenerError::InvalidRequirement(format!("cannot match keyword '{}': {}", keyword, e))
            })?;

        Ok(Self {
            keyword: keyword.to_string(),
            pattern,
        })
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn count(&self, text: &str) -> usize {
        self.pattern.find_iter(text).count()
    }

    /// One snippet per occurrence, in text order
    pub fn contexts(&self, text: &str, radius: usize) -> Vec<String> {
        self.pattern
            .find_iter(text)
            .map(|m| context_snippet(text, m.start(), m.end(), radius))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordAnalysis {
    /// Occurrences of every mandatory and optional keyword
    pub counts: BTreeMap<String, usize>,
    /// Mandatory keywords with no occurrence, in requirement order
    pub missing_mandatory: Vec<String>,
    /// Context snippets for each mandatory keyword that occurs
    pub contexts: BTreeMap<String, Vec<String>>,
}

pub struct KeywordAnalyzer {
    mandatory: Vec<KeywordMatcher>,
    optional: Vec<KeywordMatcher>,
    context_window: usize,
}

impl KeywordAnalyzer {
    pub fn new(requirement: &JobRequirement, context_window: usize) -> Result<Self> {
        let mandatory = requirement
            .mandatory()
            .iter()
            .map(|kw| KeywordMatcher::new(kw))
            .collect::<Result<Vec<_>>>()?;
        let optional = requirement
            .optional()
            .iter()
            .map(|kw| KeywordMatcher::new(kw))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            mandatory,
            optional,
            context_window,
        })
    }

    pub fn analyze(&self, text: &str) -> KeywordAnalysis {
        let mut analysis = KeywordAnalysis::default();

        for matcher in &self.mandatory {
            let snippets = matcher.contexts(text, self.context_window);
            let count = snippets.len();
            log::debug!("mandatory '{}': {} occurrence(s)", matcher.keyword(), count);

            if count == 0 {
                analysis.missing_mandatory.push(matcher.keyword().to_string());
            } else {
                analysis.contexts.insert(matcher.keyword().to_string(), snippets);
            }
            analysis.counts.insert(matcher.keyword().to_string(), count);
        }

        for matcher in &self.optional {
            let count = matcher.count(text);
            log::debug!("optional '{}': {} occurrence(s)", matcher.keyword(), count);
            analysis.counts.insert(matcher.keyword().to_string(), count);
        }

        analysis
    }
}

/// `radius` characters either side of `start..end`, clamped to the text,
/// newlines flattened and ends trimmed.
pub fn context_snippet(text: &str, start: usize, end: usize, radius: usize) -> String {
    let window_start = text[..start]
        .char_indices()
        .rev()
        .take(radius)
        .last()
        .map_or(start, |(idx, _)| idx);
    let window_end = text[end..]
        .char_indices()
        .nth(radius)
        .map_or(text.len(), |(idx, _)| end + idx);

    text[window_start..window_end].replace('\n', " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requirement(mandatory: &[&str], optional: &[&str]) -> JobRequirement {
        JobRequirement::new("", mandatory.iter().copied(), optional.iter().copied(), 0.0).unwrap()
    }

    #[test]
    fn test_whole_word_case_insensitive() {
        let matcher = KeywordMatcher::new("python").unwrap();
        assert_eq!(matcher.count("Python and PYTHON and python"), 3);
        assert_eq!(matcher.count("pythonic code, cpython"), 0);
    }

    #[test]
    fn test_keywords_are_literal() {
        let matcher = KeywordMatcher::new("node.js").unwrap();
        assert_eq!(matcher.count("built with node.js daily"), 1);
        assert_eq!(matcher.count("built with nodexjs daily"), 0);

        let cpp = KeywordMatcher::new("c++").unwrap();
        assert_eq!(cpp.count("c++ is required"), 0);
        assert!(KeywordMatcher::new("(unbalanced").is_ok());
    }

    #[test]
    fn test_multi_word_keyword() {
        let matcher = KeywordMatcher::new("machine learning").unwrap();
        assert_eq!(matcher.count("applied machine learning; machine-learning"), 1);
    }

    #[test]
    fn test_missing_mandatory_and_optional_counts() {
        let analyzer = KeywordAnalyzer::new(&requirement(&["python", "sql"], &["django", "aws"]), 50).unwrap();
        let analysis = analyzer.analyze("python, python and python with django");

        assert_eq!(analysis.missing_mandatory, vec!["sql"]);
        assert_eq!(analysis.counts["python"], 3);
        assert_eq!(analysis.counts["sql"], 0);
        assert_eq!(analysis.counts["django"], 1);
        assert_eq!(analysis.counts["aws"], 0);
        assert_eq!(analysis.contexts["python"].len(), 3);
        assert!(!analysis.contexts.contains_key("sql"));
        assert!(!analysis.contexts.contains_key("django"));
    }

    #[test]
    fn test_context_window_clamped_and_flattened() {
        let text = "intro\npython\noutro";
        let start = text.find("python").unwrap();
        let snippet = context_snippet(text, start, start + "python".len(), 50);
        assert_eq!(snippet, "intro python outro");
    }

    #[test]
    fn test_context_window_radius() {
        let text = format!("{}python{}", "a".repeat(60), "b".repeat(60));
        let snippet = context_snippet(&text, 60, 66, 50);
        assert_eq!(snippet, format!("{}python{}", "a".repeat(50), "b".repeat(50)));
    }

    #[test]
    fn test_context_window_respects_char_boundaries() {
        let text = "ééééé sql ééééé";
        let start = text.find("sql").unwrap();
        let snippet = context_snippet(text, start, start + 3, 3);
        assert_eq!(snippet, "éé sql éé");
    }
}
