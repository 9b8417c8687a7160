//! Best-effort conversion of score fields to numbers

use serde::Serialize;
use serde_json::{Number, Value};
use std::fmt;

pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 100.0;

/// Non-fatal problem found while coercing a declared-numeric field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoercionWarning {
    pub field: String,
    /// The value as the model sent it
    pub original: Value,
    pub kind: CoercionIssue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CoercionIssue {
    /// Not a number; the original string is kept
    NotNumeric,
    /// Converted, but outside the score range and clamped
    OutOfRange,
}

impl fmt::Display for CoercionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            CoercionIssue::NotNumeric => write!(
                f,
                "Could not convert {} to a number ({}); keeping it as text",
                self.field, self.original
            ),
            CoercionIssue::OutOfRange => write!(
                f,
                "{} value {} is outside {SCORE_MIN}-{SCORE_MAX}; clamped",
                self.field, self.original
            ),
        }
    }
}

/// Parse `85`, `85%`, ` 85.5 % ` into a finite float
pub fn parse_percentage(text: &str) -> Option<f64> {
    text.trim()
        .trim_end_matches('%')
        .trim_end()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Coerce a score field in place, returning at most one warning.
///
/// Numbers and numeric strings become floats in the score range. A string
/// that does not parse is left untouched. Other JSON types are left to the
/// schema check.
pub fn coerce_score(field: &str, value: &mut Value) -> Option<CoercionWarning> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => parse_percentage(text),
        _ => return None,
    };

    let Some(score) = parsed else {
        return Some(CoercionWarning {
            field: field.to_string(),
            original: value.clone(),
            kind: CoercionIssue::NotNumeric,
        });
    };

    // `+ 0.0` turns -0.0 into 0.0
    let clamped = score.clamp(SCORE_MIN, SCORE_MAX) + 0.0;
    let original = std::mem::replace(value, float_value(clamped));

    if clamped != score {
        Some(CoercionWarning {
            field: field.to_string(),
            original,
            kind: CoercionIssue::OutOfRange,
        })
    } else {
        None
    }
}

fn float_value(score: f64) -> Value {
    // Finite by construction; `from_f64` only rejects NaN and infinities
    Number::from_f64(score).map_or(Value::Null, Value::Number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_percent_string_becomes_float() {
        let mut value = json!("85%");
        assert_eq!(coerce_score("ATS_Score", &mut value), None);
        assert_eq!(value, json!(85.0));
        assert!(value.is_f64());
    }

    #[test]
    fn test_integer_becomes_float() {
        let mut value = json!(72);
        assert_eq!(coerce_score("ATS_Score", &mut value), None);
        assert!(value.is_f64());
        assert_eq!(value.as_f64(), Some(72.0));
    }

    #[test]
    fn test_plain_numeric_string_and_spacing() {
        let mut value = json!(" 64.5 % ");
        assert_eq!(coerce_score("Profile_Strength", &mut value), None);
        assert_eq!(value.as_f64(), Some(64.5));
    }

    #[test]
    fn test_non_numeric_string_kept_with_warning() {
        let mut value = json!("N/A");
        let warning = coerce_score("ATS_Score", &mut value).unwrap();
        assert_eq!(value, json!("N/A"));
        assert_eq!(warning.kind, CoercionIssue::NotNumeric);
        assert_eq!(warning.field, "ATS_Score");
        assert!(warning.to_string().contains("ATS_Score"));
    }

    #[test]
    fn test_non_finite_strings_rejected() {
        for text in ["NaN", "inf", "-infinity%"] {
            let mut value = json!(text);
            assert!(coerce_score("ATS_Score", &mut value).is_some(), "{text}");
            assert_eq!(value, json!(text));
        }
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        let mut value = json!("120%");
        let warning = coerce_score("ATS_Score", &mut value).unwrap();
        assert_eq!(warning.kind, CoercionIssue::OutOfRange);
        assert_eq!(warning.original, json!("120%"));
        assert_eq!(value.as_f64(), Some(100.0));

        let mut negative = json!(-5);
        assert!(coerce_score("ATS_Score", &mut negative).is_some());
        assert_eq!(negative.as_f64(), Some(0.0));
    }

    #[test]
    fn test_negative_zero_becomes_zero() {
        for raw in [json!("-0%"), json!(-0.0)] {
            let mut value = raw.clone();
            assert_eq!(coerce_score("ATS_Score", &mut value), None, "{raw}");
            assert_eq!(value.to_string(), "0.0");
        }
    }

    #[test]
    fn test_other_types_untouched() {
        let mut value = json!([1, 2]);
        assert_eq!(coerce_score("ATS_Score", &mut value), None);
        assert_eq!(value, json!([1, 2]));
    }

    proptest! {
        #[test]
        fn test_percent_suffix_roundtrip(score in 0u32..=10000u32) {
            let expected = f64::from(score) / 100.0;
            let mut value = json!(format!("{expected}%"));
            prop_assert_eq!(coerce_score("ATS_Score", &mut value), None);
            prop_assert_eq!(value.as_f64(), Some(expected));
            prop_assert!(!value.to_string().contains('%'));
        }
    }
}
