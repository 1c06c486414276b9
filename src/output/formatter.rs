//! Output formatters: console, JSON, markdown and HTML

use crate::config::{OutputConfig, OutputFormat};
use crate::error::{Result, ResumeScreenerError};
use crate::output::report::ScreeningReport;
use crate::processing::screener::RankedCandidate;
use askama::Template;
use colored::{Color, Colorize};
use std::path::{Path, PathBuf};

const RULE_WIDTH: usize = 50;

/// Trait for rendering a screening report
pub trait OutputFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Plain-text summary with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
    snippets_per_keyword: usize,
    snippet_max_chars: usize,
}

/// JSON formatter for API integration and structured data
pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
    snippets_per_keyword: usize,
    snippet_max_chars: usize,
}

pub struct HtmlFormatter {
    snippets_per_keyword: usize,
    snippet_max_chars: usize,
}

/// Report generator that coordinates different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

#[derive(Template)]
#[template(source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Resume Screening Results</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.6;
            color: #333;
            max-width: 900px;
            margin: 0 auto;
            padding: 20px;
            background: #f8f9fa;
        }
        .container {
            background: white;
            padding: 30px;
            border-radius: 8px;
            box-shadow: 0 2px 10px rgba(0,0,0,0.1);
        }
        .header {
            border-bottom: 3px solid #007acc;
            padding-bottom: 20px;
            margin-bottom: 20px;
        }
        .job { white-space: pre-wrap; background: #f8f9fa; padding: 15px; border-radius: 6px; }
        .candidate {
            background: #f8f9fa;
            padding: 15px;
            margin: 15px 0;
            border-radius: 6px;
            border-left: 4px solid #17a2b8;
        }
        .met { color: #28a745; font-weight: bold; }
        .unmet { color: #dc3545; font-weight: bold; }
        .snippet { font-family: monospace; font-size: 0.9em; color: #495057; }
        table { border-collapse: collapse; width: 100%; }
        th, td { text-align: left; padding: 6px 10px; border-bottom: 1px solid #e9ecef; }
        .metadata { background: #e9ecef; padding: 15px; border-radius: 6px; margin-top: 30px; font-size: 0.9em; color: #6c757d; }
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>Resume Screening Results</h1>
            <p>Generated: {{ generated_at }} | Processing time: {{ processing_time }}ms</p>
        </div>

        <h2>Job Requirements</h2>
        <div class="job">{{ job_description }}</div>
        <p><strong>Mandatory:</strong> {{ mandatory }}</p>
        <p><strong>Optional:</strong> {{ optional }}</p>
        <p><strong>Minimum Experience Required:</strong> {{ min_experience }} years</p>

        {% if candidates.is_empty() %}
        <p>No resumes matched all requirements</p>
        {% else %}
        <h2>Found {{ candidates.len() }} qualified resumes</h2>
        {% for candidate in candidates %}
        <div class="candidate">
            <h3>{{ candidate.rank }}. {{ candidate.file_name }} (Score: {{ candidate.score }})</h3>
            {% if candidate.experience_met %}
            <p>Experience: <span class="met">&#10003;</span></p>
            {% else %}
            <p>Experience: <span class="unmet">&#10007;</span> (Found: {{ candidate.experience }} yrs)</p>
            {% endif %}
            <p><strong>Keyword Evidence:</strong></p>
            <ul>
            {% for evidence in candidate.evidence %}
                <li>{{ evidence.keyword }} ({{ evidence.count }} occurrences)
                    <ol>
                    {% for snippet in evidence.snippets %}
                        <li class="snippet">{{ snippet }}</li>
                    {% endfor %}
                    </ol>
                </li>
            {% endfor %}
            </ul>
        </div>
        {% endfor %}
        {% endif %}

        {% if !rejected.is_empty() %}
        <h2>Rejected</h2>
        <table>
            <tr><th>Resume</th><th>Missing mandatory</th><th>Score</th></tr>
            {% for row in rejected %}
            <tr><td>{{ row.file_name }}</td><td>{{ row.missing }}</td><td>{{ row.score }}</td></tr>
            {% endfor %}
        </table>
        {% endif %}

        {% if !skipped.is_empty() %}
        <h2>Skipped</h2>
        <ul>
            {% for row in skipped %}
            <li>{{ row.file_name }}: {{ row.reason }}</li>
            {% endfor %}
        </ul>
        {% endif %}

        <div class="metadata">
            <p><strong>Generated by resume-screener v{{ version }}</strong> | {{ files_considered }} file(s) considered</p>
        </div>
    </div>
</body>
</html>"#, ext = "html")]
struct HtmlTemplate {
    generated_at: String,
    processing_time: u64,
    job_description: String,
    mandatory: String,
    optional: String,
    min_experience: String,
    candidates: Vec<HtmlCandidate>,
    rejected: Vec<HtmlRejected>,
    skipped: Vec<HtmlSkipped>,
    files_considered: usize,
    version: String,
}

#[derive(Debug, Clone)]
struct HtmlCandidate {
    rank: usize,
    file_name: String,
    score: String,
    experience_met: bool,
    experience: String,
    evidence: Vec<KeywordEvidence>,
}

#[derive(Debug, Clone)]
struct HtmlRejected {
    file_name: String,
    missing: String,
    score: String,
}

#[derive(Debug, Clone)]
struct HtmlSkipped {
    file_name: String,
    reason: String,
}

/// Mandatory keyword with its count and leading snippets
#[derive(Debug, Clone, PartialEq)]
struct KeywordEvidence {
    keyword: String,
    count: usize,
    snippets: Vec<String>,
}

/// Evidence for every mandatory keyword that occurs, in requirement order
fn keyword_evidence(
    report: &ScreeningReport,
    candidate: &RankedCandidate,
    snippet_limit: Option<usize>,
    snippet_max_chars: usize,
) -> Vec<KeywordEvidence> {
    report
        .requirement
        .mandatory()
        .iter()
        .filter_map(|keyword| {
            let count = candidate.analysis.keyword_counts.get(keyword).copied().unwrap_or(0);
            if count == 0 {
                return None;
            }
            let snippets = candidate
                .analysis
                .keyword_contexts
                .get(keyword)
                .map(|all| {
                    all.iter()
                        .take(snippet_limit.unwrap_or(usize::MAX))
                        .map(|s| format!("{}...", truncate_chars(s, snippet_max_chars)))
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default();
            Some(KeywordEvidence {
                keyword: keyword.clone(),
                count,
                snippets,
            })
        })
        .collect()
}

/// First `max_chars` characters of `text`
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn experience_label(candidate: &RankedCandidate) -> String {
    match candidate.experience() {
        Some(years) if years != 0.0 => format!("{:.1}", years),
        _ => "N/A".to_string(),
    }
}

fn join_or(items: &[String], empty: &str) -> String {
    if items.is_empty() {
        empty.to_string()
    } else {
        items.join(", ")
    }
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        let defaults = OutputConfig::default();
        Self {
            use_colors,
            detailed,
            snippets_per_keyword: defaults.snippets_per_keyword,
            snippet_max_chars: defaults.snippet_max_chars,
        }
    }

    pub fn with_snippets(mut self, per_keyword: usize, max_chars: usize) -> Self {
        self.snippets_per_keyword = per_keyword;
        self.snippet_max_chars = max_chars;
        self
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        if self.use_colors {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn format_candidate(&self, report: &ScreeningReport, rank: usize, candidate: &RankedCandidate) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}. {} (Score: {:.1})\n",
            rank,
            self.bold(candidate.file_name()),
            candidate.score()
        ));

        let exp_status = if candidate.experience_met {
            self.colorize("✓", Color::Green)
        } else {
            format!("{} (Found: {} yrs)", self.colorize("✗", Color::Red), experience_label(candidate))
        };
        output.push_str(&format!("   Experience: {}\n", exp_status));
        output.push_str(&format!(
            "   Missing Mandatory: {}\n",
            join_or(&candidate.analysis.missing_mandatory, "None")
        ));

        if self.detailed {
            if let Some(estimate) = &candidate.analysis.experience {
                output.push_str(&format!("   Experience source: {}\n", estimate.source));
            }
            let score = &candidate.analysis.score;
            output.push_str(&format!(
                "   Score breakdown: mandatory {:.1} + optional {:.1} + bonus {:.2}\n",
                score.mandatory, score.optional, score.experience_bonus
            ));
        }

        output.push_str("   Keyword Evidence:\n");
        let limit = if self.detailed { None } else { Some(self.snippets_per_keyword) };
        for evidence in keyword_evidence(report, candidate, limit, self.snippet_max_chars) {
            output.push_str(&format!(
                "     - {} ({} occurrences):\n",
                self.colorize(&evidence.keyword, Color::Cyan),
                evidence.count
            ));
            for (i, snippet) in evidence.snippets.iter().enumerate() {
                output.push_str(&format!("       {}. {}\n", i + 1, snippet));
            }
        }

        output.push_str(&format!("\n{}\n\n", "-".repeat(RULE_WIDTH)));
        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String> {
        let mut output = String::new();
        let rule = "=".repeat(RULE_WIDTH);

        output.push_str(&format!(
            "{}\n{}\n{}\n{}\n\n",
            rule,
            self.bold("Job Requirements:"),
            report.requirement.description().trim(),
            rule
        ));
        output.push_str(&format!(
            "Minimum Experience Required: {:.1} years\n\n",
            report.requirement.min_experience()
        ));

        if !report.has_candidates() {
            output.push_str(&self.colorize("No resumes matched all requirements", Color::Yellow));
            output.push('\n');
        } else {
            output.push_str(&format!(
                "Found {} qualified resumes:\n\n",
                self.colorize(&report.candidates.len().to_string(), Color::Green)
            ));
            for (rank, candidate) in report.ranked() {
                output.push_str(&self.format_candidate(report, rank, candidate));
            }
        }

        if self.detailed {
            if !report.rejected.is_empty() {
                output.push_str(&format!("\n{}\n", self.bold("Rejected (missing mandatory keywords):")));
                for resume in &report.rejected {
                    output.push_str(&format!(
                        "  • {} (Score: {:.1}) missing: {}\n",
                        resume.file_name,
                        resume.score,
                        resume.missing_mandatory.join(", ")
                    ));
                }
            }

            if !report.skipped.is_empty() {
                output.push_str(&format!("\n{}\n", self.bold("Skipped:")));
                for resume in &report.skipped {
                    output.push_str(&format!(
                        "  • {}: {}\n",
                        resume.file_name,
                        self.colorize(&resume.reason.to_string(), Color::Red)
                    ));
                }
            }

            output.push_str(&format!(
                "\n{} file(s) considered in {}ms\n",
                report.metadata.files_considered, report.metadata.processing_time_ms
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        let defaults = OutputConfig::default();
        Self {
            include_metadata,
            snippets_per_keyword: defaults.snippets_per_keyword,
            snippet_max_chars: defaults.snippet_max_chars,
        }
    }

    pub fn with_snippets(mut self, per_keyword: usize, max_chars: usize) -> Self {
        self.snippets_per_keyword = per_keyword;
        self.snippet_max_chars = max_chars;
        self
    }

    fn escape_cell(text: &str) -> String {
        text.replace('|', "\\|")
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String> {
        let mut output = String::new();
        let requirement = &report.requirement;

        output.push_str("# Resume Screening Results\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Processing Time:** {}ms | **Files:** {}\n\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.processing_time_ms,
                report.metadata.files_considered
            ));
        }

        output.push_str("## Job Requirements\n\n");
        if !requirement.description().trim().is_empty() {
            for line in requirement.description().trim().lines() {
                output.push_str(&format!("> {}\n", line.trim()));
            }
            output.push('\n');
        }
        output.push_str(&format!("- **Mandatory:** {}\n", join_or(requirement.mandatory(), "none")));
        output.push_str(&format!("- **Optional:** {}\n", join_or(requirement.optional(), "none")));
        output.push_str(&format!(
            "- **Minimum Experience:** {:.1} years\n\n",
            requirement.min_experience()
        ));

        output.push_str("## Ranked Candidates\n\n");
        if !report.has_candidates() {
            output.push_str("_No resumes matched all requirements._\n\n");
        } else {
            output.push_str("| Rank | Resume | Score | Experience | Requirement Met |\n");
            output.push_str("|------|--------|-------|------------|-----------------|\n");
            for (rank, candidate) in report.ranked() {
                output.push_str(&format!(
                    "| {} | `{}` | {:.1} | {} | {} |\n",
                    rank,
                    Self::escape_cell(candidate.file_name()),
                    candidate.score(),
                    experience_label(candidate),
                    if candidate.experience_met { "✅" } else { "❌" }
                ));
            }
            output.push('\n');

            for (rank, candidate) in report.ranked() {
                output.push_str(&format!("### {}. {}\n\n", rank, candidate.file_name()));
                for evidence in keyword_evidence(
                    report,
                    candidate,
                    Some(self.snippets_per_keyword),
                    self.snippet_max_chars,
                ) {
                    output.push_str(&format!("- **{}** ({} occurrences)\n", evidence.keyword, evidence.count));
                    for snippet in &evidence.snippets {
                        output.push_str(&format!("  - _{}_\n", snippet));
                    }
                }
                output.push('\n');
            }
        }

        if !report.rejected.is_empty() {
            output.push_str("## Rejected\n\n");
            output.push_str("| Resume | Missing Mandatory | Score |\n");
            output.push_str("|--------|-------------------|-------|\n");
            for resume in &report.rejected {
                output.push_str(&format!(
                    "| `{}` | {} | {:.1} |\n",
                    Self::escape_cell(&resume.file_name),
                    Self::escape_cell(&resume.missing_mandatory.join(", ")),
                    resume.score
                ));
            }
            output.push('\n');
        }

        if !report.skipped.is_empty() {
            output.push_str("## Skipped\n\n");
            for resume in &report.skipped {
                output.push_str(&format!("- `{}`: {}\n", resume.file_name, resume.reason));
            }
            output.push('\n');
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl HtmlFormatter {
    pub fn new() -> Self {
        let defaults = OutputConfig::default();
        Self {
            snippets_per_keyword: defaults.snippets_per_keyword,
            snippet_max_chars: defaults.snippet_max_chars,
        }
    }

    pub fn with_snippets(mut self, per_keyword: usize, max_chars: usize) -> Self {
        self.snippets_per_keyword = per_keyword;
        self.snippet_max_chars = max_chars;
        self
    }

    fn create_template_data(&self, report: &ScreeningReport) -> HtmlTemplate {
        let requirement = &report.requirement;

        let candidates = report
            .ranked()
            .map(|(rank, candidate)| HtmlCandidate {
                rank,
                file_name: candidate.file_name().to_string(),
                score: format!("{:.1}", candidate.score()),
                experience_met: candidate.experience_met,
                experience: experience_label(candidate),
                evidence: keyword_evidence(
                    report,
                    candidate,
                    Some(self.snippets_per_keyword),
                    self.snippet_max_chars,
                ),
            })
            .collect();

        let rejected = report
            .rejected
            .iter()
            .map(|resume| HtmlRejected {
                file_name: resume.file_name.clone(),
                missing: resume.missing_mandatory.join(", "),
                score: format!("{:.1}", resume.score),
            })
            .collect();

        let skipped = report
            .skipped
            .iter()
            .map(|resume| HtmlSkipped {
                file_name: resume.file_name.clone(),
                reason: resume.reason.to_string(),
            })
            .collect();

        HtmlTemplate {
            generated_at: report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            processing_time: report.metadata.processing_time_ms,
            job_description: requirement.description().trim().to_string(),
            mandatory: join_or(requirement.mandatory(), "none"),
            optional: join_or(requirement.optional(), "none"),
            min_experience: format!("{:.1}", requirement.min_experience()),
            candidates,
            rejected,
            skipped,
            files_considered: report.metadata.files_considered,
            version: report.metadata.version.clone(),
        }
    }
}

impl Default for HtmlFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String> {
        self.create_template_data(report)
            .render()
            .map_err(|e| ResumeScreenerError::OutputFormatting(e.to_string()))
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Html
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::from_config(&OutputConfig::default(), false)
    }

    pub fn from_config(output: &OutputConfig, detailed: bool) -> Self {
        let per_keyword = output.snippets_per_keyword;
        let max_chars = output.snippet_max_chars;

        Self {
            console_formatter: ConsoleFormatter::new(output.color_output, detailed)
                .with_snippets(per_keyword, max_chars),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true).with_snippets(per_keyword, max_chars),
            html_formatter: HtmlFormatter::new().with_snippets(per_keyword, max_chars),
        }
    }

    pub fn generate_report(&self, report: &ScreeningReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
            OutputFormat::Html => self.html_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

// Utility functions for saving reports
pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: &OutputFormat, base_name: &str, timestamp: bool) -> String {
    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        OutputFormat::Console => format!("{}_screening{}.txt", base_name, timestamp_suffix),
        OutputFormat::Json => format!("{}_screening{}.json", base_name, timestamp_suffix),
        OutputFormat::Markdown => format!("{}_screening{}.md", base_name, timestamp_suffix),
        OutputFormat::Html => format!("{}_screening{}.html", base_name, timestamp_suffix),
    }
}

/// `path` itself, or a timestamped report name inside it when it is a directory
pub fn report_destination(path: &Path, format: &OutputFormat) -> PathBuf {
    if path.is_dir() {
        path.join(suggest_filename(format, "resumes", true))
    } else {
        path.to_path_buf()
    }
}

/// Copy ranked resumes into `dir` as `<rank>_<file name>`, best first
pub fn copy_ranked_resumes(report: &ScreeningReport, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let mut copied = Vec::with_capacity(report.candidates.len());
    for (rank, candidate) in report.ranked() {
        let destination = dir.join(format!("{:02}_{}", rank, candidate.file_name()));
        std::fs::copy(&candidate.path, &destination)?;
        copied.push(destination);
    }
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::report::ReportMetadata;
    use crate::processing::analyzer::AnalysisResult;
    use crate::processing::experience::ExperienceEstimate;
    use crate::processing::requirement::JobRequirement;
    use crate::processing::scoring::ScoreBreakdown;
    use crate::processing::screener::{RejectedResume, SkipReason, SkippedResume};
    use std::collections::BTreeMap;

    fn sample_report() -> ScreeningReport {
        let requirement = JobRequirement::new(
            "Senior Python Developer",
            ["python", "nlp"],
            ["django"],
            5.0,
        )
        .unwrap();

        let mut counts = BTreeMap::new();
        counts.insert("python".to_string(), 3);
        counts.insert("nlp".to_string(), 1);
        counts.insert("django".to_string(), 0);

        let mut contexts = BTreeMap::new();
        contexts.insert(
            "python".to_string(),
            vec![
                "senior python engineer".to_string(),
                "python <script> tooling".to_string(),
                "third python mention".to_string(),
            ],
        );
        contexts.insert("nlp".to_string(), vec!["applied nlp research".to_string()]);

        let candidate = RankedCandidate {
            path: PathBuf::from("/tmp/jane.pdf"),
            experience_met: false,
            analysis: AnalysisResult {
                file_name: "jane.pdf".to_string(),
                missing_mandatory: Vec::new(),
                keyword_counts: counts,
                keyword_contexts: contexts,
                experience: Some(ExperienceEstimate {
                    years: 3.4,
                    source: "date-ranges".to_string(),
                }),
                score: ScoreBreakdown {
                    mandatory: 12.0,
                    optional: 0.0,
                    experience_bonus: 0.0,
                    total: 12.0,
                },
            },
        };

        ScreeningReport {
            requirement,
            candidates: vec![candidate],
            rejected: vec![RejectedResume {
                path: PathBuf::from("/tmp/john.docx"),
                file_name: "john.docx".to_string(),
                missing_mandatory: vec!["nlp".to_string()],
                score: 6.0,
            }],
            skipped: vec![SkippedResume {
                path: PathBuf::from("/tmp/scan.pdf"),
                file_name: "scan.pdf".to_string(),
                reason: SkipReason::EmptyText,
            }],
            metadata: ReportMetadata::new(3, 12),
        }
    }

    #[test]
    fn test_console_summary() {
        let output = ConsoleFormatter::new(false, false).format_report(&sample_report()).unwrap();

        assert!(output.contains("Job Requirements:\nSenior Python Developer"));
        assert!(output.contains("Minimum Experience Required: 5.0 years"));
        assert!(output.contains("Found 1 qualified resumes:"));
        assert!(output.contains("1. jane.pdf (Score: 12.0)"));
        assert!(output.contains("Experience: ✗ (Found: 3.4 yrs)"));
        assert!(output.contains("Missing Mandatory: None"));
        assert!(output.contains("- python (3 occurrences):"));
        assert!(output.contains("1. senior python engineer..."));
        assert!(!output.contains("third python mention"));
        assert!(!output.contains("django ("));
        assert!(!output.contains("Rejected"));
    }

    #[test]
    fn test_console_detailed_lists_rejected_and_skipped() {
        let output = ConsoleFormatter::new(false, true).format_report(&sample_report()).unwrap();
        assert!(output.contains("third python mention"));
        assert!(output.contains("john.docx (Score: 6.0) missing: nlp"));
        assert!(output.contains("scan.pdf: no extractable text"));
        assert!(output.contains("Experience source: date-ranges"));
    }

    #[test]
    fn test_console_no_matches() {
        let mut report = sample_report();
        report.candidates.clear();
        let output = ConsoleFormatter::new(false, false).format_report(&report).unwrap();
        assert!(output.contains("No resumes matched all requirements"));
    }

    #[test]
    fn test_json_contains_candidates() {
        let output = JsonFormatter::new(false).format_report(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["candidates"][0]["file_name"], "jane.pdf");
        assert_eq!(value["candidates"][0]["experience_met"], false);
        assert_eq!(value["candidates"][0]["keyword_counts"]["python"], 3);
        assert_eq!(value["skipped"][0]["reason"]["kind"], "empty_text");
        assert_eq!(value["requirement"]["min_experience"], 5.0);
    }

    #[test]
    fn test_markdown_tables() {
        let output = MarkdownFormatter::new(false).format_report(&sample_report()).unwrap();
        assert!(output.contains("| 1 | `jane.pdf` | 12.0 | 3.4 | ❌ |"));
        assert!(output.contains("| `john.docx` | nlp | 6.0 |"));
        assert!(output.contains("- `scan.pdf`: no extractable text"));
    }

    #[test]
    fn test_html_escapes_snippets() {
        let output = HtmlFormatter::new().format_report(&sample_report()).unwrap();
        assert!(output.contains("jane.pdf"));
        assert!(output.contains("python &#60;script&#62; tooling..."));
        assert!(!output.contains("<script>"));
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("héllo world", 5), "héllo");
        assert_eq!(truncate_chars("short", 100), "short");
    }

    #[test]
    fn test_report_destination() {
        let dir = tempfile::TempDir::new().unwrap();

        let inside = report_destination(dir.path(), &OutputFormat::Markdown);
        assert_eq!(inside.parent(), Some(dir.path()));
        let name = inside.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("resumes_screening_"));
        assert!(name.ends_with(".md"));

        let file = dir.path().join("report.json");
        assert_eq!(report_destination(&file, &OutputFormat::Json), file);
    }

    #[test]
    fn test_suggest_filename() {
        assert_eq!(suggest_filename(&OutputFormat::Json, "backend", false), "backend_screening.json");
        assert_eq!(suggest_filename(&OutputFormat::Html, "backend", false), "backend_screening.html");
    }
}
