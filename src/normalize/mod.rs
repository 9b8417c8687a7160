//! Response normalization
//!
//! Turns a raw model completion into a [`NormalizedRecord`] checked against a
//! [`TaskSchema`]. Parsing is an ordered fallback chain:
//!
//! 1. direct parse of the trimmed completion, after trailing-comma repair
//! 2. the same repair and parse on the first `{` .. last `}` span
//! 3. [`NormalizeError::Malformed`] carrying the untouched completion
//!
//! A parsed object is then validated against the schema (all or nothing), and
//! declared-numeric fields are coerced to floats. Coercion problems are
//! returned as warnings next to the record, never as errors.
//!
//! ```
//! use resume_coach::normalize::{Normalizer, ParsePath};
//! use resume_coach::task::schema::ATS_RESUME;
//!
//! let raw = "Here you go:\n{\"ATS_Score\": \"85%\", \"Strengths\": [\"clear\",],\
//!            \"Improvements\": [], \"Keywords\": [], \"Formatting\": \"ok\"}\nHope this helps!";
//! let normalized = Normalizer::new().normalize(raw, &ATS_RESUME).unwrap();
//! assert_eq!(normalized.parse_path, ParsePath::Extracted);
//! assert_eq!(normalized.record.score("ATS_Score"), Some(85.0));
//! ```

pub mod coerce;
pub mod repair;
pub mod validate;

pub use coerce::{CoercionIssue, CoercionWarning};
pub use repair::{extract_object_span, repair_trailing_commas};
pub use validate::{FieldMismatch, SchemaViolation};

use crate::task::TaskSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

/// Fatal normalization failures
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// Neither parse attempt produced a JSON object
    #[error("Malformed response: {reason}")]
    Malformed { raw: String, reason: String },

    #[error("Schema violation: {0}")]
    SchemaViolation(SchemaViolation),
}

/// Which step of the fallback chain produced the record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParsePath {
    Direct,
    Extracted,
}

/// What to do with fields the schema does not declare, at any depth
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraFieldPolicy {
    /// Remove them so the record carries exactly the declared fields
    #[default]
    Drop,
    /// Treat them as a schema violation
    Reject,
}

/// Validated response fields, in the order the model emitted them
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NormalizedRecord(Map<String, Value>);

impl NormalizedRecord {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn score(&self, field: &str) -> Option<f64> {
        self.0.get(field).and_then(Value::as_f64)
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// String items of a list field; empty if absent
    pub fn text_list(&self, field: &str) -> Vec<&str> {
        self.0
            .get(field)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Nested records of a list-of-object field; empty if absent
    pub fn objects(&self, field: &str) -> Vec<&Map<String, Value>> {
        self.0
            .get(field)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_object).collect())
            .unwrap_or_default()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Downloadable text: two-space indented JSON, stable for a given record
    pub fn to_artifact(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.0)
    }
}

/// Successful normalization
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Normalized {
    pub record: NormalizedRecord,
    pub warnings: Vec<CoercionWarning>,
    pub parse_path: ParsePath,
    /// Undeclared fields removed under [`ExtraFieldPolicy::Drop`]
    pub dropped_fields: Vec<String>,
}

/// Validates raw completions against task schemas
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    extra_fields: ExtraFieldPolicy,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extra_field_policy(extra_fields: ExtraFieldPolicy) -> Self {
        Self { extra_fields }
    }

    /// Normalize `raw` against `schema`
    pub fn normalize(&self, raw: &str, schema: &TaskSchema) -> Result<Normalized, NormalizeError> {
        let (mut fields, parse_path) = parse_completion(raw)?;

        let mut violation = SchemaViolation::new(schema.name);
        validate::check_fields(schema.fields, &fields, "", &mut violation);
        let unexpected = match self.extra_fields {
            ExtraFieldPolicy::Reject => Vec::new(),
            ExtraFieldPolicy::Drop => std::mem::take(&mut violation.unexpected),
        };
        if !violation.is_empty() {
            debug!(schema = schema.name, %violation, "Rejecting response");
            return Err(NormalizeError::SchemaViolation(violation));
        }

        if !unexpected.is_empty() {
            warn!(
                schema = schema.name,
                fields = ?unexpected,
                "Dropping fields not declared by the schema"
            );
            validate::retain_declared(schema.fields, &mut fields);
        }

        let mut warnings = Vec::new();
        for name in schema.numeric_fields() {
            if let Some(value) = fields.get_mut(name) {
                if let Some(warning) = coerce::coerce_score(name, value) {
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        Ok(Normalized {
            record: NormalizedRecord(fields),
            warnings,
            parse_path,
            dropped_fields: unexpected,
        })
    }
}

/// Run the parse fallback chain without any schema
pub fn parse_completion(raw: &str) -> Result<(Map<String, Value>, ParsePath), NormalizeError> {
    let trimmed = raw.trim();

    let direct_error = match parse_object(trimmed) {
        Ok(fields) => {
            debug!(fields = fields.len(), "Parsed completion directly");
            return Ok((fields, ParsePath::Direct));
        }
        Err(e) => e,
    };
    debug!(error = %direct_error, "Direct parse failed, extracting object span");

    let Some(span) = extract_object_span(trimmed) else {
        return Err(NormalizeError::Malformed {
            raw: raw.to_string(),
            reason: format!("no JSON object found in response ({direct_error})"),
        });
    };

    match parse_object(span) {
        Ok(fields) => {
            debug!(fields = fields.len(), "Parsed extracted object span");
            Ok((fields, ParsePath::Extracted))
        }
        Err(e) => Err(NormalizeError::Malformed {
            raw: raw.to_string(),
            reason: format!("extracted content is not valid JSON: {e}"),
        }),
    }
}

fn parse_object(candidate: &str) -> Result<Map<String, Value>, String> {
    let repaired = repair_trailing_commas(candidate);
    match serde_json::from_str::<Value>(&repaired) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(other) => Err(format!(
            "expected a JSON object, found {}",
            validate::json_type_name(&other)
        )),
        Err(e) => Err(e.to_string()),
    }
}
