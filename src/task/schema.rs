//! Static response schemas, one per structured feature
//!
//! Field names here are the wire contract with the model: the prompt
//! templates ask for exactly these keys, so they must match verbatim.

use serde_json::Value;

/// Declared type of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Score or percentage, stored as `f64` in [0, 100]
    Number,
    Text,
    TextList,
    /// Nested record with its own declared fields
    Object(&'static [FieldSpec]),
    /// Sequence of nested records sharing one declaration
    ObjectList(&'static [FieldSpec]),
}

impl FieldKind {
    /// Whether a parsed JSON value can satisfy this kind.
    ///
    /// Numbers also accept strings: those go through coercion, which
    /// downgrades an unconvertible value to a warning instead of a failure.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldKind::Number => value.is_number() || value.is_string(),
            FieldKind::Text => value.is_string(),
            FieldKind::TextList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
            FieldKind::Object(_) => value.is_object(),
            FieldKind::ObjectList(_) => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_object)),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::Number => "number",
            FieldKind::Text => "string",
            FieldKind::TextList => "list of strings",
            FieldKind::Object(_) => "object",
            FieldKind::ObjectList(_) => "list of objects",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn field(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, kind }
}

/// Expected top-level fields of one feature's response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSchema {
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
}

impl TaskSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|spec| spec.name)
    }

    /// Fields that hold scores and go through percentage coercion
    pub fn numeric_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields
            .iter()
            .filter(|spec| spec.kind == FieldKind::Number)
            .map(|spec| spec.name)
    }
}

pub const ATS_RESUME: TaskSchema = TaskSchema {
    name: "ats_resume",
    fields: &[
        field("ATS_Score", FieldKind::Number),
        field("Strengths", FieldKind::TextList),
        field("Improvements", FieldKind::TextList),
        field("Keywords", FieldKind::TextList),
        field("Formatting", FieldKind::Text),
    ],
};

pub const ATS_WITH_JD: TaskSchema = TaskSchema {
    name: "ats_with_jd",
    fields: &[
        field("ATS_Compatibility_Score", FieldKind::Number),
        field("Matched_Keywords", FieldKind::TextList),
        field("Missing_Keywords", FieldKind::TextList),
        field("Improvement_Suggestions", FieldKind::TextList),
        field("Overall_Assessment", FieldKind::Text),
    ],
};

pub const JOB_DESCRIPTION: TaskSchema = TaskSchema {
    name: "job_description",
    fields: &[
        field("Essential_Skills", FieldKind::TextList),
        field("Key_Qualifications", FieldKind::TextList),
        field("Main_Responsibilities", FieldKind::TextList),
        field("Company_Culture", FieldKind::TextList),
        field("Resume_Keywords", FieldKind::TextList),
    ],
};

pub const LINKEDIN_PROFILE: TaskSchema = TaskSchema {
    name: "linkedin_profile",
    fields: &[
        field("Profile_Strength", FieldKind::Number),
        field("Strengths", FieldKind::TextList),
        field("Improvements", FieldKind::TextList),
        field("Visibility_Suggestions", FieldKind::TextList),
        field("Keyword_Recommendations", FieldKind::TextList),
        field("Content_Ideas", FieldKind::TextList),
    ],
};

const STAR_ANSWER: &[FieldSpec] = &[
    field("Situation", FieldKind::Text),
    field("Task", FieldKind::Text),
    field("Action", FieldKind::Text),
    field("Result", FieldKind::Text),
];

const INTERVIEW_QUESTION: &[FieldSpec] = &[
    field("Question", FieldKind::Text),
    field("STAR_Answer", FieldKind::Object(STAR_ANSWER)),
    field("Additional_Tips", FieldKind::TextList),
];

pub const INTERVIEW_PREP: TaskSchema = TaskSchema {
    name: "interview_prep",
    fields: &[field(
        "Interview_Questions",
        FieldKind::ObjectList(INTERVIEW_QUESTION),
    )],
};

const COURSE_RECOMMENDATION: &[FieldSpec] = &[
    field("Course_Name", FieldKind::Text),
    field("Provider", FieldKind::Text),
];

const SKILL_GAP: &[FieldSpec] = &[
    field("Skill", FieldKind::Text),
    field(
        "Course_Recommendation",
        FieldKind::Object(COURSE_RECOMMENDATION),
    ),
];

pub const SKILL_GAP_ANALYSIS: TaskSchema = TaskSchema {
    name: "skill_gap",
    fields: &[
        field("Skills_in_Resume", FieldKind::TextList),
        field("Skills_Required", FieldKind::TextList),
        field("Skill_Gaps", FieldKind::ObjectList(SKILL_GAP)),
    ],
};
