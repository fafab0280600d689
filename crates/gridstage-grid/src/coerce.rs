//! Draft-string coercion shared by the edit session and the filter engine.
//!
//! An in-place cell editor always yields a string. What gets staged in the
//! overlay depends on the tag of the value the cell held before editing:
//! the draft is parsed back into that shape where it cleanly can be, and
//! falls back to text otherwise. Parse failures are never surfaced as
//! errors.

use gridstage_core::Value;

/// Coerce an editor draft against the cell's original value.
///
/// Rules, in order:
/// - empty draft -> `Null`
/// - numeric original and the draft parses as a number -> numeric
///   (integer-shaped drafts on integer cells stay `Int`)
/// - boolean original and the draft is literally `"true"`/`"false"` -> `Bool`
/// - JSON original and the draft parses as JSON -> `Json`
/// - anything else -> `Text` verbatim
pub fn coerce_draft(original: &Value, draft: &str) -> Value {
    if draft.is_empty() {
        return Value::Null;
    }
    match original {
        Value::Int(_) => {
            if let Ok(n) = draft.trim().parse::<i64>() {
                Value::Int(n)
            } else if let Ok(f) = draft.trim().parse::<f64>() {
                Value::Float(f)
            } else {
                Value::Text(draft.to_string())
            }
        }
        Value::Float(_) => match draft.trim().parse::<f64>() {
            Ok(f) => Value::Float(f),
            Err(_) => Value::Text(draft.to_string()),
        },
        Value::Bool(_) => match draft {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => Value::Text(draft.to_string()),
        },
        Value::Json(_) => match serde_json::from_str(draft) {
            Ok(json) => Value::Json(json),
            Err(_) => Value::Text(draft.to_string()),
        },
        Value::Geometry(_) => Value::Geometry(draft.to_string()),
        Value::Null | Value::Text(_) => Value::Text(draft.to_string()),
    }
}

/// Emptiness test used by the `isEmpty`/`isNotEmpty` filter operators:
/// NULL or the empty string.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Text(s) => s.is_empty(),
        Value::Geometry(s) => s.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_draft_becomes_null() {
        assert_eq!(coerce_draft(&Value::Text("x".into()), ""), Value::Null);
        assert_eq!(coerce_draft(&Value::Int(3), ""), Value::Null);
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(coerce_draft(&Value::Int(1), "42"), Value::Int(42));
        assert_eq!(coerce_draft(&Value::Int(1), "4.5"), Value::Float(4.5));
        assert_eq!(coerce_draft(&Value::Float(0.0), "2.5"), Value::Float(2.5));
        // Unparsable drafts on numeric cells fall back to text.
        assert_eq!(
            coerce_draft(&Value::Int(1), "12abc"),
            Value::Text("12abc".into())
        );
    }

    #[test]
    fn test_boolean_coercion_is_literal() {
        assert_eq!(coerce_draft(&Value::Bool(false), "true"), Value::Bool(true));
        assert_eq!(coerce_draft(&Value::Bool(true), "false"), Value::Bool(false));
        assert_eq!(
            coerce_draft(&Value::Bool(true), "TRUE"),
            Value::Text("TRUE".into())
        );
        assert_eq!(
            coerce_draft(&Value::Bool(true), "yes"),
            Value::Text("yes".into())
        );
    }

    #[test]
    fn test_json_coercion() {
        assert_eq!(
            coerce_draft(&Value::Json(serde_json::json!({})), r#"{"a":1}"#),
            Value::Json(serde_json::json!({"a": 1}))
        );
        assert_eq!(
            coerce_draft(&Value::Json(serde_json::json!({})), "{not json"),
            Value::Text("{not json".into())
        );
    }

    #[test]
    fn test_null_and_text_originals_stay_text() {
        assert_eq!(coerce_draft(&Value::Null, "7"), Value::Text("7".into()));
        assert_eq!(
            coerce_draft(&Value::Text("a".into()), "b"),
            Value::Text("b".into())
        );
    }

    #[test]
    fn test_is_empty_value() {
        assert!(is_empty_value(&Value::Null));
        assert!(is_empty_value(&Value::Text(String::new())));
        assert!(!is_empty_value(&Value::Text(" ".into())));
        assert!(!is_empty_value(&Value::Int(0)));
        assert!(!is_empty_value(&Value::Bool(false)));
    }
}
