//! Prompt templates with variable interpolation

use super::{Feature, TaskRequest};
use crate::error::Result;
use tera::{Context, Tera};
use tracing::{debug, trace};

const ATS_RESUME: &str = r#"Analyze this resume and provide:
1. An overall ATS score (0-100)
2. Strengths of the resume
3. Areas for improvement
4. Keyword analysis
5. Formatting and structure assessment

Resume:
{{ resume }}

Provide the response in the following JSON format:
{
    "ATS_Score": <score>,
    "Strengths": ["<strength1>", "<strength2>", ...],
    "Improvements": ["<improvement1>", "<improvement2>", ...],
    "Keywords": ["<keyword1>", "<keyword2>", ...],
    "Formatting": "<formatting_assessment>"
}
"#;

const ATS_RESUME_JD: &str = r#"Analyze this resume against the job description and provide:
1. An ATS compatibility score (0-100)
2. Matched keywords between the resume and job description
3. Missing keywords from the job description
4. Suggestions for improvement
5. Overall assessment of the resume's fit for the position

Resume:
{{ resume }}

Job Description:
{{ job_description }}

Provide the response in the following JSON format:
{
    "ATS_Compatibility_Score": <score>,
    "Matched_Keywords": ["<keyword1>", "<keyword2>", ...],
    "Missing_Keywords": ["<keyword1>", "<keyword2>", ...],
    "Improvement_Suggestions": ["<suggestion1>", "<suggestion2>", ...],
    "Overall_Assessment": "<assessment_text>"
}
"#;

const CONTENT_SUGGESTIONS: &str = r#"Provide real-time suggestions for improving this resume or cover letter content:

Content:
{{ content }}

Please provide suggestions for:
1. Improving clarity and conciseness
2. Enhancing the impact of achievements
3. Optimizing for ATS systems
4. Addressing any grammatical or structural issues

Format your response as a bulleted list for easy reading.
"#;

const GENERATE_RESUME: &str = r#"Generate a tailored resume and cover letter based on the following information:

Job Description:
{{ job_description }}
{% if current_resume %}
Current Resume: {{ current_resume }}
{% endif %}
Please provide:
1. A bullet-point outline for a tailored resume
2. A draft cover letter

{% if current_resume -%}
If a current resume is provided, use it as a base and suggest improvements to tailor it to the job description.
{%- else -%}
Create a new resume outline based on the job description.
{%- endif %}

Format your response as follows:

Resume Outline:
- [Section 1]
  - [Bullet point 1]
  - [Bullet point 2]
- [Section 2]
  - [Bullet point 1]
  - [Bullet point 2]

Cover Letter:
[Cover letter text]
"#;

const ANALYZE_JD: &str = r#"Analyze this job description and extract:
1. Essential skills required
2. Key qualifications
3. Main responsibilities
4. Company culture indicators
5. Potential keywords for resume optimization

Job Description:
{{ job_description }}

Provide the response in the following JSON format:
{
    "Essential_Skills": ["<skill1>", "<skill2>", ...],
    "Key_Qualifications": ["<qualification1>", "<qualification2>", ...],
    "Main_Responsibilities": ["<responsibility1>", "<responsibility2>", ...],
    "Company_Culture": ["<indicator1>", "<indicator2>", ...],
    "Resume_Keywords": ["<keyword1>", "<keyword2>", ...]
}
"#;

const COMPANY_INFO: &str = r#"Provide detailed information about {{ company }} that would be helpful for a job interview. Include:
1. Brief company history
2. Main products or services
3. Company culture and values
4. Key competitors

Format the response in a clear, easy-to-read structure with headings for each section.
"#;

const LINKEDIN: &str = r#"Analyze this LinkedIn profile and provide:
1. An overall profile strength score (0-100)
2. Strengths of the profile
3. Areas for improvement
4. Suggestions for enhancing visibility and reach
5. Keyword optimization recommendations
6. Content ideas for posts or articles

LinkedIn Profile:
{{ profile }}

Provide the response in the following JSON format:
{
    "Profile_Strength": <score>,
    "Strengths": ["<strength1>", "<strength2>", ...],
    "Improvements": ["<improvement1>", "<improvement2>", ...],
    "Visibility_Suggestions": ["<suggestion1>", "<suggestion2>", ...],
    "Keyword_Recommendations": ["<keyword1>", "<keyword2>", ...],
    "Content_Ideas": ["<idea1>", "<idea2>", ...]
}
"#;

const INTERVIEW_PREP: &str = r#"Based on the following job description and resume, please:
1. Generate 10 likely interview questions
2. For each question, provide a suggested answer using the STAR (Situation, Task, Action, Result) method
3. Offer additional tips for answering each question effectively

Job Description:
{{ job_description }}

Resume:
{{ resume }}

Provide the response in the following JSON format:
{
    "Interview_Questions": [
        {
            "Question": "<question1>",
            "STAR_Answer": {
                "Situation": "<situation>",
                "Task": "<task>",
                "Action": "<action>",
                "Result": "<result>"
            },
            "Additional_Tips": ["<tip1>", "<tip2>", ...]
        },
        ...
    ]
}
"#;

const SKILL_GAP: &str = r#"Based on the following resume and job description, please:
1. Identify the skills present in the resume
2. Identify the skills required by the job description
3. Determine the skill gaps (skills required but not present in the resume)
4. For each skill gap, recommend an online course or resource to learn that skill

Resume:
{{ resume }}

Job Description:
{{ job_description }}

Provide the response in the following JSON format:
{
    "Skills_in_Resume": ["<skill1>", "<skill2>", ...],
    "Skills_Required": ["<skill1>", "<skill2>", ...],
    "Skill_Gaps": [
        {
            "Skill": "<skill1>",
            "Course_Recommendation": {
                "Course_Name": "<course_name>",
                "Provider": "<provider>"
            }
        },
        ...
    ]
}
"#;

const KEYWORD_SUGGESTIONS: &str = r#"Given the following missing keywords from a resume and the job description,
provide specific suggestions on how to incorporate these keywords into the resume effectively.
Consider the context of the job description when making suggestions.

Missing Keywords: {{ missing_keywords | join(sep=", ") }}

Job Description:
{{ job_description }}

Please provide detailed suggestions for each keyword, including:
1. Where in the resume to add the keyword (e.g., skills section, work experience, etc.)
2. How to phrase it naturally within the context of the resume
3. If applicable, suggest a brief example of how to demonstrate experience with the keyword

Format your response as a bulleted list for easy reading.
"#;

fn template_source(feature: Feature) -> &'static str {
    match feature {
        Feature::AtsResume => ATS_RESUME,
        Feature::AtsWithJobDescription => ATS_RESUME_JD,
        Feature::ContentSuggestions => CONTENT_SUGGESTIONS,
        Feature::GenerateResume => GENERATE_RESUME,
        Feature::AnalyzeJobDescription => ANALYZE_JD,
        Feature::CompanyInfo => COMPANY_INFO,
        Feature::LinkedinOptimization => LINKEDIN,
        Feature::InterviewPreparation => INTERVIEW_PREP,
        Feature::SkillGapAnalysis => SKILL_GAP,
        Feature::KeywordSuggestions => KEYWORD_SUGGESTIONS,
    }
}

/// Renders the instruction string for a [`TaskRequest`]
pub struct PromptEngine {
    tera: Tera,
}

impl PromptEngine {
    /// Create a prompt engine with every feature template registered
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]); // Resumes are plain text, not HTML

        tera.add_raw_templates(
            Feature::ALL
                .into_iter()
                .map(|feature| (feature.slug(), template_source(feature))),
        )?;

        Ok(Self { tera })
    }

    /// Render the prompt for a request
    pub fn render(&self, request: &TaskRequest) -> Result<String> {
        let feature = request.feature();
        let context = build_context(request);
        let prompt = self.tera.render(feature.slug(), &context)?;

        debug!(
            feature = feature.slug(),
            chars = prompt.len(),
            "Rendered prompt"
        );
        trace!("Prompt body: {}", crate::llm::log_preview(&prompt));
        Ok(prompt)
    }
}

fn build_context(request: &TaskRequest) -> Context {
    let mut context = Context::new();
    match request {
        TaskRequest::AtsResume { resume } => {
            context.insert("resume", resume);
        }
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
        } => {
            context.insert("resume", resume);
            context.insert("job_description", job_description);
        }
        TaskRequest::ContentSuggestions { content } => {
            context.insert("content", content);
        }
        TaskRequest::GenerateResume {
            job_description,
            current_resume,
        } => {
            context.insert("job_description", job_description);
            // Empty string is falsy in the template, which drops the section
            let current = current_resume
                .as_deref()
                .map(str::trim)
                .unwrap_or_default();
            context.insert("current_resume", current);
        }
        TaskRequest::AnalyzeJobDescription { job_description } => {
            context.insert("job_description", job_description);
        }
        TaskRequest::CompanyInfo { company } => {
            context.insert("company", company.trim());
        }
        TaskRequest::LinkedinOptimization { profile } => {
            context.insert("profile", profile);
        }
        TaskRequest::KeywordSuggestions {
            missing_keywords,
            job_description,
        } => {
            let keywords: Vec<&str> = missing_keywords
                .iter()
                .map(|k| k.trim())
                .filter(|k| !k.is_empty())
                .collect();
            context.insert("missing_keywords", &keywords);
            context.insert("job_description", job_description);
        }
    }
    context
}
