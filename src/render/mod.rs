//! Terminal presentation of feature outcomes

pub mod progress;

pub use progress::SpinnerProgress;

use crate::error::CoachError;
use crate::normalize::{Normalized, NormalizedRecord};
use crate::session::{FeatureOutcome, FeatureResult};
use crate::task::Feature;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Plain-text report assembled section by section
#[derive(Debug, Default)]
struct Report {
    lines: Vec<String>,
}

impl Report {
    fn heading(&mut self, title: &str) {
        if !self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.lines.push(format!("== {title} =="));
    }

    fn subheading(&mut self, title: &str) {
        self.lines.push(String::new());
        self.lines.push(format!("{title}:"));
    }

    fn line(&mut self, text: impl Into<String>) {
        self.lines.push(text.into());
    }

    fn bullets<'a>(&mut self, items: impl IntoIterator<Item = &'a str>) {
        let before = self.lines.len();
        self.lines
            .extend(items.into_iter().map(|item| format!("  - {item}")));
        if self.lines.len() == before {
            self.lines.push("  (none)".to_string());
        }
    }

    fn joined(&mut self, items: &[&str]) {
        if items.is_empty() {
            self.line("  (none)");
        } else {
            self.line(format!("  {}", items.join(", ")));
        }
    }

    fn finish(self) -> String {
        self.lines.join("\n")
    }
}

/// Render a score as `N/100`; unconverted values are shown as-is
pub fn format_score(value: Option<&Value>) -> String {
    match value {
        Some(Value::Number(n)) => match n.as_f64() {
            Some(score) => format!("{score}/100"),
            None => n.to_string(),
        },
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "n/a".to_string(),
    }
}

fn field_text<'a>(object: &'a Map<String, Value>, name: &str) -> &'a str {
    object.get(name).and_then(Value::as_str).unwrap_or("")
}

fn field_list<'a>(object: &'a Map<String, Value>, name: &str) -> Vec<&'a str> {
    object
        .get(name)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

/// Human-readable report for one outcome
pub fn format_outcome(outcome: &FeatureOutcome) -> String {
    match &outcome.result {
        FeatureResult::Structured(normalized) => format_structured(outcome.feature, normalized),
        FeatureResult::Text(text) => format_text(outcome, text),
    }
}

fn format_text(outcome: &FeatureOutcome, text: &str) -> String {
    let mut report = Report::default();
    let title = match outcome.feature {
        Feature::ContentSuggestions => "Improvement Suggestions".to_string(),
        Feature::GenerateResume => "Generated Content".to_string(),
        Feature::CompanyInfo => format!(
            "Information about {}",
            outcome.artifact_name.trim_end_matches("_info").replace('_', " ")
        ),
        Feature::KeywordSuggestions => "Keyword Incorporation Suggestions".to_string(),
        other => other.label().to_string(),
    };
    report.heading(&title);
    report.line(text);
    report.finish()
}

fn format_structured(feature: Feature, normalized: &Normalized) -> String {
    let record = &normalized.record;
    let mut report = Report::default();

    match feature {
        Feature::AtsResume => {
            report.heading("ATS Analysis Results");
            report.line(format!("ATS Score: {}", format_score(record.get("ATS_Score"))));
            report.subheading("Strengths");
            report.bullets(record.text_list("Strengths"));
            report.subheading("Areas for Improvement");
            report.bullets(record.text_list("Improvements"));
            report.subheading("Key Keywords Detected");
            report.joined(&record.text_list("Keywords"));
            report.subheading("Formatting Assessment");
            report.line(format!("  {}", record.text("Formatting").unwrap_or("")));
        }
        Feature::AtsWithJobDescription => {
            report.heading("ATS Compatibility Analysis");
            report.line(format!(
                "ATS Compatibility Score: {}",
                format_score(record.get("ATS_Compatibility_Score"))
            ));
            report.subheading("Matched Keywords");
            report.joined(&record.text_list("Matched_Keywords"));
            report.subheading("Missing Keywords");
            report.joined(&record.text_list("Missing_Keywords"));
            report.subheading("Suggestions for Improvement");
            report.bullets(record.text_list("Improvement_Suggestions"));
            report.subheading("Overall Assessment");
            report.line(format!("  {}", record.text("Overall_Assessment").unwrap_or("")));
        }
        Feature::AnalyzeJobDescription => {
            report.heading("Job Description Analysis Results");
            for (field, title) in [
                ("Essential_Skills", "Essential Skills"),
                ("Key_Qualifications", "Key Qualifications"),
                ("Main_Responsibilities", "Main Responsibilities"),
                ("Company_Culture", "Company Culture Indicators"),
            ] {
                report.subheading(title);
                report.bullets(record.text_list(field));
            }
            report.subheading("Potential Resume Keywords");
            report.joined(&record.text_list("Resume_Keywords"));
        }
        Feature::LinkedinOptimization => {
            report.heading("LinkedIn Profile Analysis Results");
            report.line(format!(
                "Profile Strength: {}",
                format_score(record.get("Profile_Strength"))
            ));
            report.subheading("Strengths");
            report.bullets(record.text_list("Strengths"));
            report.subheading("Areas for Improvement");
            report.bullets(record.text_list("Improvements"));
            report.subheading("Visibility Enhancement Suggestions");
            report.bullets(record.text_list("Visibility_Suggestions"));
            report.subheading("Keyword Optimization Recommendations");
            report.joined(&record.text_list("Keyword_Recommendations"));
            report.subheading("Content Ideas for Posts or Articles");
            report.bullets(record.text_list("Content_Ideas"));
        }
        Feature::InterviewPreparation => {
            report.heading("Interview Preparation Guide");
            for (i, qa) in record.objects("Interview_Questions").into_iter().enumerate() {
                report.subheading(&format!("Question {}: {}", i + 1, field_text(qa, "Question")));
                if let Some(star) = qa.get("STAR_Answer").and_then(Value::as_object) {
                    for part in ["Situation", "Task", "Action", "Result"] {
                        report.line(format!("  {part}: {}", field_text(star, part)));
                    }
                }
                report.line("  Additional Tips:");
                report.bullets(field_list(qa, "Additional_Tips"));
            }
        }
        Feature::SkillGapAnalysis => {
            report.heading("Skill Gap Analysis Results");
            report.subheading("Skills in Your Resume");
            report.bullets(record.text_list("Skills_in_Resume"));
            report.subheading("Skills Required for the Job");
            report.bullets(record.text_list("Skills_Required"));
            report.subheading("Skill Gaps and Course Recommendations");
            let gaps = record.objects("Skill_Gaps");
            if gaps.is_empty() {
                report.line("  (none)");
            }
            for gap in gaps {
                let course = gap.get("Course_Recommendation").and_then(Value::as_object);
                report.line(format!("  * {}", field_text(gap, "Skill")));
                if let Some(course) = course {
                    report.line(format!(
                        "    Recommended Course: {}",
                        field_text(course, "Course_Name")
                    ));
                    report.line(format!("    Available at: {}", field_text(course, "Provider")));
                }
            }
        }
        other => {
            report.heading(other.label());
            report.line(record.to_artifact().unwrap_or_default());
        }
    }

    if !normalized.warnings.is_empty() {
        report.subheading("Warnings");
        let warnings: Vec<String> = normalized.warnings.iter().map(ToString::to_string).collect();
        report.bullets(warnings.iter().map(String::as_str));
    }

    report.finish()
}

/// Report for a failed action; malformed responses include the raw text
pub fn format_error(error: &CoachError) -> String {
    let mut message = format!("Error during {}: {error}", error.stage());
    if let Some(raw) = error.raw_completion() {
        message.push_str("\nRaw response:\n");
        message.push_str(raw);
    }
    message
}

/// Missing keywords to feed into a keyword-suggestion follow-up
pub fn missing_keywords(record: &NormalizedRecord) -> Vec<String> {
    record
        .text_list("Missing_Keywords")
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Write `<dir>/<name>.txt`, creating `dir` as needed
pub fn write_artifact(dir: &Path, name: &str, contents: &str) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{name}.txt"));
    std::fs::write(&path, contents)?;
    debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(path)
}

pub fn show_outcome(outcome: &FeatureOutcome) {
    println!("\n{}", format_outcome(outcome));
}

pub fn show_error(error: &CoachError) {
    eprintln!("\n❌ {}", format_error(error));
}

pub fn show_saved(path: &Path) {
    println!("\n💾 Results saved to {}", path.display());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{NormalizeError, Normalizer};
    use tempfile::TempDir;

    fn outcome(feature: Feature, raw: &str) -> FeatureOutcome {
        let schema = feature.schema().unwrap();
        FeatureOutcome {
            feature,
            artifact_name: "test".to_string(),
            result: FeatureResult::Structured(Normalizer::new().normalize(raw, schema).unwrap()),
        }
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(Some(&serde_json::json!(78.0))), "78/100");
        assert_eq!(format_score(Some(&serde_json::json!(82.5))), "82.5/100");
        assert_eq!(format_score(Some(&serde_json::json!("N/A"))), "N/A");
        assert_eq!(format_score(None), "n/a");
    }

    #[test]
    fn test_ats_report() {
        let report = format_outcome(&outcome(
            Feature::AtsResume,
            r#"{"ATS_Score": "78%", "Strengths": ["Clear layout"], "Improvements": [], "Keywords": ["Rust", "Tokio"], "Formatting": "Clean"}"#,
        ));

        assert!(report.starts_with("== ATS Analysis Results =="));
        assert!(report.contains("ATS Score: 78/100"));
        assert!(report.contains("  - Clear layout"));
        assert!(report.contains("  Rust, Tokio"));
        assert!(report.contains("  (none)"));
    }

    #[test]
    fn test_report_lists_coercion_warnings() {
        let report = format_outcome(&outcome(
            Feature::AtsResume,
            r#"{"ATS_Score": "N/A", "Strengths": [], "Improvements": [], "Keywords": [], "Formatting": ""}"#,
        ));
        assert!(report.contains("ATS Score: N/A"));
        assert!(report.contains("Warnings:"));
        assert!(report.contains("ATS_Score"));
    }

    #[test]
    fn test_interview_report() {
        let report = format_outcome(&outcome(
            Feature::InterviewPreparation,
            r#"{"Interview_Questions": [{"Question": "Tell me about a outage", "STAR_Answer": {"Situation": "S", "Task": "T", "Action": "A", "Result": "R"}, "Additional_Tips": ["Be concise"]}]}"#,
        ));
        assert!(report.contains("Question 1: Tell me about a outage"));
        assert!(report.contains("  Result: R"));
        assert!(report.contains("  - Be concise"));
    }

    #[test]
    fn test_skill_gap_report() {
        let report = format_outcome(&outcome(
            Feature::SkillGapAnalysis,
            r#"{"Skills_in_Resume": ["Rust"], "Skills_Required": ["Rust", "Kubernetes"], "Skill_Gaps": [{"Skill": "Kubernetes", "Course_Recommendation": {"Course_Name": "CKA Prep", "Provider": "Linux Foundation"}}]}"#,
        ));
        assert!(report.contains("  * Kubernetes"));
        assert!(report.contains("Recommended Course: CKA Prep"));
        assert!(report.contains("Available at: Linux Foundation"));
    }

    #[test]
    fn test_company_text_report() {
        let outcome = FeatureOutcome {
            feature: Feature::CompanyInfo,
            artifact_name: "Acme_Corp_info".to_string(),
            result: FeatureResult::Text("Founded 1999.".to_string()),
        };
        assert_eq!(
            format_outcome(&outcome),
            "== Information about Acme Corp ==\nFounded 1999."
        );
    }

    #[test]
    fn test_error_report_includes_raw_text() {
        let error = CoachError::from(NormalizeError::Malformed {
            raw: "Sorry, no JSON".to_string(),
            reason: "no JSON object found in response".to_string(),
        });
        let message = format_error(&error);
        assert!(message.starts_with("Error during response parsing: Malformed response"));
        assert!(message.ends_with("Raw response:\nSorry, no JSON"));
    }

    #[test]
    fn test_missing_keywords() {
        let outcome = outcome(
            Feature::AtsWithJobDescription,
            r#"{"ATS_Compatibility_Score": 60, "Matched_Keywords": [], "Missing_Keywords": ["Kafka", "gRPC"], "Improvement_Suggestions": [], "Overall_Assessment": "ok"}"#,
        );
        let record = &outcome.structured().unwrap().record;
        assert_eq!(missing_keywords(record), vec!["Kafka", "gRPC"]);
    }

    #[test]
    fn test_write_artifact() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("results");

        let path = write_artifact(&out, "skill_gap_analysis", "{}").unwrap();

        assert_eq!(path, out.join("skill_gap_analysis.txt"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "{}");
    }
}
