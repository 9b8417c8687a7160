//! Feature catalogue
//!
//! Every user-facing feature is a [`Feature`] variant. A [`TaskRequest`]
//! carries the inputs one feature needs; its prompt template and optional
//! response schema are resolved from the feature by exhaustive matches.

pub mod schema;
pub mod templates;

pub use schema::{FieldKind, FieldSpec, TaskSchema};
pub use templates::PromptEngine;

use crate::error::{CoachError, Result};
use std::fmt;

/// Closed set of coach features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    AtsResume,
    AtsWithJobDescription,
    ContentSuggestions,
    GenerateResume,
    AnalyzeJobDescription,
    CompanyInfo,
    LinkedinOptimization,
    InterviewPreparation,
    SkillGapAnalysis,
    KeywordSuggestions,
}

impl Feature {
    pub const ALL: [Feature; 10] = [
        Feature::AtsResume,
        Feature::AtsWithJobDescription,
        Feature::ContentSuggestions,
        Feature::GenerateResume,
        Feature::AnalyzeJobDescription,
        Feature::CompanyInfo,
        Feature::LinkedinOptimization,
        Feature::InterviewPreparation,
        Feature::SkillGapAnalysis,
        Feature::KeywordSuggestions,
    ];

    /// Stable identifier, also used as the template name
    pub fn slug(&self) -> &'static str {
        match self {
            Feature::AtsResume => "ats-resume",
            Feature::AtsWithJobDescription => "ats-resume-jd",
            Feature::ContentSuggestions => "real-time-suggestions",
            Feature::GenerateResume => "generate-resume",
            Feature::AnalyzeJobDescription => "analyze-jd",
            Feature::CompanyInfo => "company-info",
            Feature::LinkedinOptimization => "linkedin-optimization",
            Feature::InterviewPreparation => "interview-preparation",
            Feature::SkillGapAnalysis => "skill-gap-analysis",
            Feature::KeywordSuggestions => "keyword-suggestions",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Feature::AtsResume => "ATS Check - Resume Only",
            Feature::AtsWithJobDescription => "ATS Check - Resume with Job Description",
            Feature::ContentSuggestions => "Real-time Content Suggestions",
            Feature::GenerateResume => "Generate Resume/Cover Letter",
            Feature::AnalyzeJobDescription => "Job Description Analysis",
            Feature::CompanyInfo => "Company Information for Interview Prep",
            Feature::LinkedinOptimization => "AI-Powered LinkedIn Optimization",
            Feature::InterviewPreparation => "Interview Preparation",
            Feature::SkillGapAnalysis => "Skill Gap Analysis and Courses Recommendation",
            Feature::KeywordSuggestions => "Missing Keyword Suggestions",
        }
    }

    /// Response schema; `None` for features whose answer is free text
    pub fn schema(&self) -> Option<&'static TaskSchema> {
        match self {
            Feature::AtsResume => Some(&schema::ATS_RESUME),
            Feature::AtsWithJobDescription => Some(&schema::ATS_WITH_JD),
            Feature::AnalyzeJobDescription => Some(&schema::JOB_DESCRIPTION),
            Feature::LinkedinOptimization => Some(&schema::LINKEDIN_PROFILE),
            Feature::InterviewPreparation => Some(&schema::INTERVIEW_PREP),
            Feature::SkillGapAnalysis => Some(&schema::SKILL_GAP_ANALYSIS),
            Feature::ContentSuggestions
            | Feature::GenerateResume
            | Feature::CompanyInfo
            | Feature::KeywordSuggestions => None,
        }
    }

    pub fn from_slug(slug: &str) -> Option<Feature> {
        Feature::ALL.into_iter().find(|f| f.slug() == slug)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inputs for one feature run
#[derive(Debug, Clone, PartialEq)]
pub enum TaskRequest {
    AtsResume {
        resume: String,
    },
    AtsWithJobDescription {
        resume: String,
        job_description: String,
    },
    ContentSuggestions {
        content: String,
    },
    GenerateResume {
        job_description: String,
        /// Prior resume; its section is omitted from the prompt when absent
        current_resume: Option<String>,
    },
    AnalyzeJobDescription {
        job_description: String,
    },
    CompanyInfo {
        company: String,
    },
    LinkedinOptimization {
        profile: String,
    },
    InterviewPreparation {
        resume: String,
        job_description: String,
    },
    SkillGapAnalysis {
        resume: String,
        job_description: String,
    },
    KeywordSuggestions {
        missing_keywords: Vec<String>,
        job_description: String,
    },
}

impl TaskRequest {
    pub fn feature(&self) -> Feature {
        match self {
            TaskRequest::AtsResume { .. } => Feature::AtsResume,
            TaskRequest::AtsWithJobDescription { .. } => Feature::AtsWithJobDescription,
            TaskRequest::ContentSuggestions { .. } => Feature::ContentSuggestions,
            TaskRequest::GenerateResume { .. } => Feature::GenerateResume,
            TaskRequest::AnalyzeJobDescription { .. } => Feature::AnalyzeJobDescription,
            TaskRequest::CompanyInfo { .. } => Feature::CompanyInfo,
            TaskRequest::LinkedinOptimization { .. } => Feature::LinkedinOptimization,
            TaskRequest::InterviewPreparation { .. } => Feature::InterviewPreparation,
            TaskRequest::SkillGapAnalysis { .. } => Feature::SkillGapAnalysis,
            TaskRequest::KeywordSuggestions { .. } => Feature::KeywordSuggestions,
        }
    }

    /// Reject blank required inputs before anything is sent to the model
    pub fn validate(&self) -> Result<()> {
        let required: Vec<(&str, &str)> = match self {
            TaskRequest::AtsResume { resume } => vec![("resume", resume.as_str())],
            TaskRequest::AtsWithJobDescription {
                resume,
                job_description,
            }
            | TaskRequest::InterviewPreparation {
                resume,
                job_description,
            }
            | TaskRequest::SkillGapAnalysis {
                resume,
                job_description,
            } => vec![
                ("resume", resume.as_str()),
                ("job description", job_description.as_str()),
            ],
            TaskRequest::ContentSuggestions { content } => vec![("content", content.as_str())],
            TaskRequest::GenerateResume {
                job_description, ..
            }
            | TaskRequest::AnalyzeJobDescription { job_description } => {
                vec![("job description", job_description.as_str())]
            }
            TaskRequest::CompanyInfo { company } => vec![("company name", company.as_str())],
            TaskRequest::LinkedinOptimization { profile } => vec![("LinkedIn profile", profile.as_str())],
            TaskRequest::KeywordSuggestions {
                missing_keywords,
                job_description,
            } => {
                if missing_keywords.iter().all(|k| k.trim().is_empty()) {
                    return Err(CoachError::MissingInput(
                        "at least one missing keyword is required".to_string(),
                    ));
                }
                vec![("job description", job_description.as_str())]
            }
        };

        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((name, _)) => Err(CoachError::MissingInput(format!("{name} is empty"))),
            None => Ok(()),
        }
    }

    /// Base name (without extension) of the downloadable artifact
    pub fn artifact_name(&self) -> String {
        match self {
            TaskRequest::AtsResume { .. } => "ats_analysis_results".to_string(),
            TaskRequest::AtsWithJobDescription { .. } => "ats_compatibility_analysis".to_string(),
            TaskRequest::ContentSuggestions { .. } => "content_suggestions".to_string(),
            TaskRequest::GenerateResume { .. } => "generated_resume_cover_letter".to_string(),
            TaskRequest::AnalyzeJobDescription { .. } => "job_description_analysis".to_string(),
            TaskRequest::CompanyInfo { company } => format!("{}_info", file_stem(company)),
            TaskRequest::LinkedinOptimization { .. } => "linkedin_profile_analysis".to_string(),
            TaskRequest::InterviewPreparation { .. } => "interview_preparation_guide".to_string(),
            TaskRequest::SkillGapAnalysis { .. } => "skill_gap_analysis".to_string(),
            TaskRequest::KeywordSuggestions { .. } => "keyword_suggestions".to_string(),
        }
    }
}

/// Reduce free text to something safe to use in a file name
fn file_stem(text: &str) -> String {
    let stem: String = text
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    if stem.is_empty() {
        "company".to_string()
    } else {
        stem
    }
}
