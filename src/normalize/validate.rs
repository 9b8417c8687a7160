//! Explicit schema checks run right after parsing

use crate::task::{FieldKind, FieldSpec};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// A declared field whose JSON type cannot satisfy its kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMismatch {
    pub path: String,
    pub expected: &'static str,
    pub found: &'static str,
}

/// Why a parsed response was rejected against its schema
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaViolation {
    pub schema: &'static str,
    pub missing: Vec<String>,
    pub mismatched: Vec<FieldMismatch>,
    /// Undeclared fields at any depth
    pub unexpected: Vec<String>,
}

impl SchemaViolation {
    pub fn new(schema: &'static str) -> Self {
        Self {
            schema,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.mismatched.is_empty() && self.unexpected.is_empty()
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "response does not match the {} schema", self.schema)?;
        if !self.missing.is_empty() {
            write!(f, "; missing fields: {}", self.missing.join(", "))?;
        }
        if !self.mismatched.is_empty() {
            let details: Vec<String> = self
                .mismatched
                .iter()
                .map(|m| format!("{} (expected {}, found {})", m.path, m.expected, m.found))
                .collect();
            write!(f, "; wrong types: {}", details.join(", "))?;
        }
        if !self.unexpected.is_empty() {
            write!(f, "; unexpected fields: {}", self.unexpected.join(", "))?;
        }
        Ok(())
    }
}

fn field_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

/// Check `object` against `fields`, descending into nested records
pub fn check_fields(
    fields: &[FieldSpec],
    object: &Map<String, Value>,
    prefix: &str,
    violation: &mut SchemaViolation,
) {
    for name in object.keys() {
        if !fields.iter().any(|spec| spec.name == name) {
            violation.unexpected.push(field_path(prefix, name));
        }
    }

    for spec in fields {
        let path = field_path(prefix, spec.name);

        let Some(value) = object.get(spec.name) else {
            violation.missing.push(path);
            continue;
        };

        if !spec.kind.accepts(value) {
            violation.mismatched.push(FieldMismatch {
                path,
                expected: spec.kind.label(),
                found: json_type_name(value),
            });
            continue;
        }

        match (spec.kind, value) {
            (FieldKind::Object(nested), Value::Object(inner)) => {
                check_fields(nested, inner, &path, violation);
            }
            (FieldKind::ObjectList(nested), Value::Array(items)) => {
                for (index, item) in items.iter().enumerate() {
                    if let Value::Object(inner) = item {
                        check_fields(nested, inner, &format!("{path}[{index}]"), violation);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Remove undeclared keys from `object` and every nested record
pub fn retain_declared(fields: &[FieldSpec], object: &mut Map<String, Value>) {
    object.retain(|name, _| fields.iter().any(|spec| spec.name == name));

    for spec in fields {
        match (spec.kind, object.get_mut(spec.name)) {
            (FieldKind::Object(nested), Some(Value::Object(inner))) => {
                retain_declared(nested, inner);
            }
            (FieldKind::ObjectList(nested), Some(Value::Array(items))) => {
                for inner in items.iter_mut().filter_map(Value::as_object_mut) {
                    retain_declared(nested, inner);
                }
            }
            _ => {}
        }
    }
}

pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::schema::{ATS_RESUME, INTERVIEW_PREP};
    use serde_json::json;

    fn check(schema: &crate::task::TaskSchema, value: Value) -> SchemaViolation {
        let mut violation = SchemaViolation::new(schema.name);
        check_fields(
            schema.fields,
            value.as_object().unwrap(),
            "",
            &mut violation,
        );
        violation
    }

    #[test]
    fn test_conforming_record_has_no_violation() {
        let violation = check(
            &ATS_RESUME,
            json!({
                "ATS_Score": "72%",
                "Strengths": ["clear"],
                "Improvements": [],
                "Keywords": ["rust"],
                "Formatting": "fine"
            }),
        );
        assert!(violation.is_empty());
    }

    #[test]
    fn test_reports_missing_and_mismatched() {
        let violation = check(
            &ATS_RESUME,
            json!({
                "ATS_Score": 72,
                "Strengths": "clear",
                "Keywords": []
            }),
        );
        assert_eq!(violation.missing, vec!["Improvements", "Formatting"]);
        assert_eq!(
            violation.mismatched,
            vec![FieldMismatch {
                path: "Strengths".to_string(),
                expected: "list of strings",
                found: "string",
            }]
        );
    }

    #[test]
    fn test_nested_paths() {
        let violation = check(
            &INTERVIEW_PREP,
            json!({
                "Interview_Questions": [
                    {
                        "Question": "Why Rust?",
                        "STAR_Answer": {"Situation": "s", "Task": "t", "Action": "a", "Result": "r"},
                        "Additional_Tips": []
                    },
                    {
                        "Question": "Tell me about a failure",
                        "STAR_Answer": {"Situation": "s", "Action": "a", "Result": 3},
                        "Additional_Tips": []
                    }
                ]
            }),
        );
        assert_eq!(
            violation.missing,
            vec!["Interview_Questions[1].STAR_Answer.Task"]
        );
        assert_eq!(
            violation.mismatched[0].path,
            "Interview_Questions[1].STAR_Answer.Result"
        );
    }

    #[test]
    fn test_undeclared_keys_reported_at_every_depth() {
        let violation = check(
            &INTERVIEW_PREP,
            json!({
                "Interview_Questions": [
                    {
                        "Question": "Why Rust?",
                        "STAR_Answer": {"Situation": "s", "Task": "t", "Action": "a", "Result": "r", "Confidence": 0.2},
                        "Additional_Tips": [],
                        "Difficulty": "hard"
                    }
                ],
                "Summary": "x"
            }),
        );
        assert!(violation.missing.is_empty());
        assert_eq!(
            violation.unexpected,
            vec![
                "Summary",
                "Interview_Questions[0].Difficulty",
                "Interview_Questions[0].STAR_Answer.Confidence",
            ]
        );
    }

    #[test]
    fn test_retain_declared_prunes_nested_records() {
        let mut value = json!({
            "Interview_Questions": [
                {
                    "Question": "Why Rust?",
                    "STAR_Answer": {"Situation": "s", "Task": "t", "Action": "a", "Result": "r", "Confidence": 0.2},
                    "Additional_Tips": [],
                    "Difficulty": "hard"
                }
            ]
        });
        retain_declared(INTERVIEW_PREP.fields, value.as_object_mut().unwrap());
        assert_eq!(
            value,
            json!({
                "Interview_Questions": [
                    {
                        "Question": "Why Rust?",
                        "STAR_Answer": {"Situation": "s", "Task": "t", "Action": "a", "Result": "r"},
                        "Additional_Tips": []
                    }
                ]
            })
        );
    }

    #[test]
    fn test_display_lists_every_problem() {
        let mut violation = SchemaViolation::new("ats_resume");
        violation.missing.push("Formatting".to_string());
        violation.unexpected.push("Extra".to_string());
        let text = violation.to_string();
        assert!(text.contains("missing fields: Formatting"));
        assert!(text.contains("unexpected fields: Extra"));
    }
}
