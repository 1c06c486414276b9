//! Heuristic years-of-experience extraction
//!
//! Strategies are tried in order and the first one producing a value wins.
//! Explicit statements ("5 years experience", "experience: 3 yrs", ...) come
//! first, one strategy per phrasing; summing month-year date ranges is the
//! fallback.

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Days per year used to turn date differences into years
const DAYS_PER_YEAR: f64 = 365.25;

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEstimate {
    pub years: f64,
    /// Name of the strategy that produced the value
    pub source: String,
}

pub trait ExperienceStrategy: Send + Sync {
    fn name(&self) -> &str;

    /// `today` stands in for "present" in date ranges
    fn estimate(&self, text: &str, today: NaiveDate) -> Option<f64>;
}

/// A phrase like "5 years experience"; the first capture group is the number
pub struct ExplicitStatement {
    name: &'static str,
    pattern: Regex,
}

impl ExplicitStatement {
    pub fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("Invalid experience regex"),
        }
    }
}

impl ExperienceStrategy for ExplicitStatement {
    fn name(&self) -> &str {
        self.name
    }

    fn estimate(&self, text: &str, _today: NaiveDate) -> Option<f64> {
        self.pattern
            .captures_iter(text)
            .find_map(|caps| to_ascii_digits(caps.get(1)?.as_str()).parse::<f64>().ok())
    }
}

/// Sum of the durations of every "mon yyyy - mon yyyy|present" range
pub struct DateRangeSum {
    range_pattern: Regex,
    separator: Regex,
}

impl DateRangeSum {
    pub fn new() -> Self {
        let month = "(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*";
        let range_pattern = Regex::new(&format!(
            r"(?i){month}\s*\d{{4}}\s*[-–—]\s*(?:{month}\s*\d{{4}}|present\b)"
        ))
        .expect("Invalid date range regex");
        let separator = Regex::new(r"\s*[-–—]\s*").expect("Invalid date separator regex");

        Self {
            range_pattern,
            separator,
        }
    }

    /// Duration in years of one matched range, if it parses and is positive
    fn range_years(&self, range: &str, today: NaiveDate) -> Option<f64> {
        let parts: Vec<&str> = self.separator.split(range).collect();
        if parts.len() != 2 {
            return None;
        }

        let start = parse_month_year(parts[0].trim())?;
        let end_part = parts[1].trim();
        let end = if end_part.eq_ignore_ascii_case("present") {
            NaiveDate::from_ymd_opt(today.year(), today.month(), 1)?
        } else {
            parse_month_year(end_part)?
        };

        let years = (end - start).num_days() as f64 / DAYS_PER_YEAR;
        (years > 0.0).then_some(years)
    }
}

impl Default for DateRangeSum {
    fn default() -> Self {
        Self::new()
    }
}

impl ExperienceStrategy for DateRangeSum {
    fn name(&self) -> &str {
        "date-ranges"
    }

    fn estimate(&self, text: &str, today: NaiveDate) -> Option<f64> {
        let mut total = 0.0;
        let mut valid_ranges = 0;

        for range in self.range_pattern.find_iter(text) {
            match self.range_years(range.as_str(), today) {
                Some(years) => {
                    total += years;
                    valid_ranges += 1;
                }
                None => log::debug!("Skipping unparseable date range '{}'", range.as_str()),
            }
        }

        (valid_ranges > 0).then_some(total)
    }
}

/// First day of the month named by the first three characters, in the year
/// given by the last four characters.
fn parse_month_year(value: &str) -> Option<NaiveDate> {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() < 4 {
        return None;
    }

    let month_abbrev: String = chars.iter().take(3).collect::<String>().to_lowercase();
    let year: String = chars[chars.len() - 4..].iter().collect();

    let month = MONTHS.iter().position(|m| *m == month_abbrev)? as u32 + 1;
    let year: i32 = to_ascii_digits(&year).parse().ok()?;
    if year < 1 {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn decimal_digit() -> &'static Regex {
    static DIGIT: OnceLock<Regex> = OnceLock::new();
    DIGIT.get_or_init(|| Regex::new(r"^\p{Nd}$").expect("Invalid digit regex"))
}

fn is_decimal_digit(c: char) -> bool {
    let mut buf = [0u8; 4];
    decimal_digit().is_match(c.encode_utf8(&mut buf))
}

/// Value of a decimal digit from any script. `Nd` digits are laid out in
/// contiguous runs of ten starting at zero.
fn digit_value(c: char) -> Option<u32> {
    if let Some(d) = c.to_digit(10) {
        return Some(d);
    }
    if !is_decimal_digit(c) {
        return None;
    }

    let mut zero = c as u32;
    while let Some(prev) = zero.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal_digit(prev) {
            break;
        }
        zero -= 1;
    }
    Some((c as u32 - zero) % 10)
}

/// `\d` matches digits of every script; `str::parse` wants ASCII
fn to_ascii_digits(value: &str) -> String {
    value
        .chars()
        .map(|c| digit_value(c).and_then(|d| char::from_digit(d, 10)).unwrap_or(c))
        .collect()
}

/// Ordered list of experience strategies
pub struct ExperienceExtractor {
    strategies: Vec<Box<dyn ExperienceStrategy>>,
}

impl ExperienceExtractor {
    pub fn new() -> Self {
        Self::with_strategies(Self::default_strategies())
    }

    pub fn with_strategies(strategies: Vec<Box<dyn ExperienceStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn default_strategies() -> Vec<Box<dyn ExperienceStrategy>> {
        vec![
            Box::new(ExplicitStatement::new(
                "years-experience",
                r"(\d+\.?\d*)\s*(years?|yrs?)\s*(experience|exp)",
            )),
            Box::new(ExplicitStatement::new(
                "experience-label",
                r"experience\s*:\s*(\d+\.?\d*)\s*(years?|yrs?)",
            )),
            Box::new(ExplicitStatement::new(
                "years-in-field",
                r"(\d+)\+?\s*(years?|yrs?)\s*in\s*.*(experience|exp)",
            )),
            Box::new(ExplicitStatement::new(
                "years-professional",
                r"(\d+\.?\d*)\s*(years?|yrs?)\s*professional",
            )),
            Box::new(ExplicitStatement::new(
                "years-relevant",
                r"(\d+)\s*(years?|yrs?)\s*relevant",
            )),
            Box::new(DateRangeSum::new()),
        ]
    }

    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn extract_at(&self, text: &str, today: NaiveDate) -> Option<ExperienceEstimate> {
        self.strategies.iter().find_map(|strategy| {
            strategy.estimate(text, today).map(|years| ExperienceEstimate {
                years,
                source: strategy.name().to_string(),
            })
        })
    }
}

impl Default for ExperienceExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn extract(text: &str) -> Option<ExperienceEstimate> {
        ExperienceExtractor::new().extract_at(text, today())
    }

    #[test]
    fn test_experience_label_short_circuits_date_ranges() {
        let estimate = extract("summary\nexperience: 5 years\nacme corp jan 2010 - dec 2019").unwrap();
        assert_eq!(estimate.years, 5.0);
        assert_eq!(estimate.source, "experience-label");
    }

    #[test]
    fn test_pattern_order_beats_text_order() {
        // "professional" appears first in the text but its strategy ranks lower
        let estimate = extract("over 10 yrs professional work. 4 years experience in python").unwrap();
        assert_eq!(estimate.years, 4.0);
        assert_eq!(estimate.source, "years-experience");
    }

    #[test]
    fn test_first_match_within_pattern_wins() {
        let estimate = extract("2.5 years exp at startup, later 8 years experience").unwrap();
        assert_eq!(estimate.years, 2.5);
    }

    #[test]
    fn test_years_in_field() {
        let estimate = extract("7+ years in backend development experience").unwrap();
        assert_eq!(estimate.years, 7.0);
        assert_eq!(estimate.source, "years-in-field");
    }

    #[test]
    fn test_years_relevant() {
        let estimate = extract("3 years relevant background").unwrap();
        assert_eq!(estimate.years, 3.0);
        assert_eq!(estimate.source, "years-relevant");
    }

    #[test]
    fn test_date_ranges_are_summed() {
        let estimate = extract("engineer, jan 2018 - dec 2019\nlead, mar 2020 - present").unwrap();
        // 2018-01-01..2019-12-01 is 699 days, 2020-03-01..2024-03-01 is 1461 days
        let expected = (699.0 + 1461.0) / DAYS_PER_YEAR;
        assert!((estimate.years - expected).abs() < 1e-9);
        assert_eq!(estimate.source, "date-ranges");
    }

    #[test]
    fn test_full_month_names_and_dashes() {
        let estimate = extract("september 2019 – march 2021 and june 2021—june 2022").unwrap();
        let expected = (547.0 + 365.0) / DAYS_PER_YEAR;
        assert!((estimate.years - expected).abs() < 1e-9);
    }

    #[test]
    fn test_year_zero_range_is_skipped() {
        let estimate = extract("jan 0000 - dec 2019, jan 2020 - jan 2021").unwrap();
        assert!((estimate.years - 366.0 / DAYS_PER_YEAR).abs() < 1e-9);
    }

    #[test]
    fn test_non_ascii_digits_are_parsed() {
        let estimate = extract("jan ٢٠١٨ - dec 2019, jan 2020 - jan 2021").unwrap();
        assert!((estimate.years - (699.0 + 366.0) / DAYS_PER_YEAR).abs() < 1e-9);

        let estimate = extract("٥ years experience").unwrap();
        assert_eq!(estimate.years, 5.0);
        assert_eq!(estimate.source, "years-experience");
    }

    #[test]
    fn test_to_ascii_digits() {
        assert_eq!(to_ascii_digits("٢٠١٨"), "2018");
        assert_eq!(to_ascii_digits("१२.५"), "12.5");
        assert_eq!(to_ascii_digits("２０２０"), "2020");
        assert_eq!(to_ascii_digits("2019"), "2019");
    }

    #[test]
    fn test_reversed_range_contributes_nothing() {
        assert_eq!(extract("dec 2019 - jan 2018"), None);
    }

    #[test]
    fn test_no_experience_found() {
        assert_eq!(extract("python developer, sql, machine learning"), None);
        assert_eq!(extract(""), None);
    }

    #[test]
    fn test_parse_month_year_uses_prefix_and_suffix() {
        assert_eq!(parse_month_year("sept 2019"), NaiveDate::from_ymd_opt(2019, 9, 1));
        assert_eq!(parse_month_year("Feb2020"), NaiveDate::from_ymd_opt(2020, 2, 1));
        assert_eq!(parse_month_year("foo 2020"), None);
        assert_eq!(parse_month_year("jan"), None);
    }

    #[test]
    fn test_strategy_order() {
        let extractor = ExperienceExtractor::new();
        assert_eq!(
            extractor.strategy_names(),
            vec![
                "years-experience",
                "experience-label",
                "years-in-field",
                "years-professional",
                "years-relevant",
                "date-ranges",
            ]
        );
    }
}
