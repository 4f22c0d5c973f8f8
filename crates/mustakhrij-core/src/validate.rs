//! Schema validation: coerce a recovered JSON value into extracted records
//!
//! The model may return the record list bare, wrapped in an object under an
//! arbitrary key, or as a single record object. The wrapper shape is
//! resolved exactly once into [`Candidates`]; downstream code never inspects
//! the raw value again.

use serde_json::Value;
use tracing::debug;
use tracing::warn;

use crate::error::Error;
use crate::error::Result;
use crate::record::ExtractedRecord;
use crate::schema::ExtractionSchema;
use crate::schema::FieldKind;

/// The candidate records located inside a recovered JSON value
#[derive(Debug, Clone)]
pub enum Candidates {
    /// The value was a bare list
    List(Vec<Value>),
    /// The value was an object wrapping a list under some key
    Wrapped {
        /// The key the list was found under
        key: String,
        /// The wrapped elements
        items: Vec<Value>,
    },
    /// The value was a single record-shaped object
    Single(Value),
}

impl Candidates {
    /// The candidate elements, in source order
    pub fn into_items(self) -> Vec<Value> {
        match self {
            Self::List(items) | Self::Wrapped { items, .. } => items,
            Self::Single(value) => vec![value],
        }
    }
}

/// Validation output: records in source order plus a summary of what was
/// skipped or sentinel-filled. Candidates that are not objects are counted
/// as invalid and skipped, never turned into a crash.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    /// Validated records, in source order
    pub records: Vec<ExtractedRecord>,
    /// Number of candidates that were not record-shaped at all
    pub invalid: usize,
    /// Representative description of the first invalid candidate
    pub first_invalid: Option<String>,
    /// Number of records that had at least one field sentinel-filled
    pub incomplete: usize,
}

/// Locate the candidate records inside a recovered JSON value.
///
/// Lists are taken as-is. For objects, the first list-valued key wins,
/// whatever its name; an object with no list value is accepted as a single
/// record if it carries at least one of the schema's required fields.
pub fn resolve_candidates(value: &Value, schema: &ExtractionSchema) -> Result<Candidates> {
    match value {
        Value::Array(items) => Ok(Candidates::List(items.clone())),
        Value::Object(map) => {
            for (key, val) in map {
                if let Value::Array(items) = val {
                    debug!(key = %key, count = items.len(), "found wrapped candidate list");
                    return Ok(Candidates::Wrapped {
                        key: key.clone(),
                        items: items.clone(),
                    });
                }
            }
            if schema.field_names().any(|name| map.contains_key(name)) {
                return Ok(Candidates::Single(value.clone()));
            }
            Err(Error::NoStructuredData(format!(
                "object has no list value and none of the {} required fields",
                schema.fields.len()
            )))
        }
        other => Err(Error::NoStructuredData(format!(
            "expected a list or object, got {}",
            type_name(other)
        ))),
    }
}

/// Validate a recovered JSON value against a schema.
///
/// Every object candidate becomes a record: missing required fields are
/// filled with the schema's sentinel rather than rejecting the record.
/// Non-object candidates are counted and skipped. A bad candidate never
/// affects its neighbours.
pub fn validate(value: &Value, schema: &ExtractionSchema) -> Result<ValidationReport> {
    let candidates = resolve_candidates(value, schema)?.into_items();

    let mut report = ValidationReport {
        records: Vec::with_capacity(candidates.len()),
        invalid: 0,
        first_invalid: None,
        incomplete: 0,
    };

    for (index, candidate) in candidates.iter().enumerate() {
        match candidate {
            Value::Object(map) => {
                let record = validate_object(map, schema);
                if !record.is_complete() {
                    report.incomplete += 1;
                }
                report.records.push(record);
            }
            other => {
                report.invalid += 1;
                if report.first_invalid.is_none() {
                    report.first_invalid = Some(format!(
                        "candidate {} is {}, not an object",
                        index,
                        type_name(other)
                    ));
                }
            }
        }
    }

    if report.invalid > 0 {
        warn!(
            invalid = report.invalid,
            first = report.first_invalid.as_deref().unwrap_or(""),
            "skipped non-record candidates"
        );
    }

    Ok(report)
}

/// Validation output for a comparison-mode reply: per-subject records plus
/// one summary record
#[derive(Debug, Clone)]
pub struct ComparisonReport {
    /// Per-subject validation output
    pub subjects: ValidationReport,
    /// The comparison summary record, when the wrapper carried one
    pub summary: Option<ExtractedRecord>,
}

/// Validate a comparison-mode wrapper: a list of per-subject records under
/// `list_key` plus one summary object under `summary_key`.
///
/// If the model renamed the list key, resolution falls back to the usual
/// wrapper tolerance. A missing or malformed summary is logged and dropped;
/// it never discards the per-subject records.
pub fn validate_comparison(
    value: &Value,
    subject_schema: &ExtractionSchema,
    summary_schema: &ExtractionSchema,
    list_key: &str,
    summary_key: &str,
) -> Result<ComparisonReport> {
    let subjects = match value.get(list_key) {
        Some(list @ Value::Array(_)) => validate(list, subject_schema)?,
        _ => validate(value, subject_schema)?,
    };

    let summary = match value.get(summary_key) {
        Some(Value::Object(map)) => Some(validate_object(map, summary_schema)),
        Some(other) => {
            warn!(key = %summary_key, "comparison summary is {}, not an object", type_name(other));
            None
        }
        None => {
            warn!(key = %summary_key, "comparison summary missing from reply");
            None
        }
    };

    Ok(ComparisonReport { subjects, summary })
}

/// Build a record from an object: required fields first in schema order
/// (sentinel-filled and kind-coerced), then any extra keys in source order
fn validate_object(
    map: &serde_json::Map<String, Value>,
    schema: &ExtractionSchema,
) -> ExtractedRecord {
    let mut fields = Vec::with_capacity(map.len().max(schema.fields.len()));
    let mut missing = Vec::new();

    for spec in &schema.fields {
        match map.get(&spec.name) {
            Some(value) if !value.is_null() => {
                fields.push((spec.name.clone(), coerce(value, spec.kind, &schema.sentinel)));
            }
            _ => {
                missing.push(spec.name.clone());
                fields.push((spec.name.clone(), sentinel_value(spec.kind, &schema.sentinel)));
            }
        }
    }

    for (key, value) in map {
        if !schema.contains(key) {
            fields.push((key.clone(), value.clone()));
        }
    }

    ExtractedRecord::new(fields, missing)
}

/// Coerce a present value toward the field's kind. Coercion is lenient:
/// a value that resists (a word where a number belongs) is kept as the
/// sentinel rather than dropping the record.
fn coerce(value: &Value, kind: FieldKind, sentinel: &str) -> Value {
    match kind {
        FieldKind::ShortText | FieldKind::LongText => match value {
            Value::String(s) => Value::String(s.clone()),
            Value::Number(n) => Value::String(n.to_string()),
            Value::Bool(b) => Value::String(b.to_string()),
            Value::Array(items) => {
                let parts: Vec<String> = items
                    .iter()
                    .map(|v| match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect();
                Value::String(parts.join("، "))
            }
            other => other.clone(),
        },
        FieldKind::TextList => match value {
            Value::Array(_) => value.clone(),
            Value::String(s) => Value::Array(vec![Value::String(s.clone())]),
            other => Value::Array(vec![other.clone()]),
        },
        FieldKind::Number => match value {
            Value::Number(_) => value.clone(),
            Value::String(s) => match s.trim().parse::<f64>() {
                Ok(n) => serde_json::Number::from_f64(n)
                    .map(Value::Number)
                    .unwrap_or_else(|| Value::String(sentinel.to_string())),
                Err(_) => Value::String(sentinel.to_string()),
            },
            _ => Value::String(sentinel.to_string()),
        },
    }
}

/// The placeholder written for an absent field
fn sentinel_value(kind: FieldKind, sentinel: &str) -> Value {
    match kind {
        FieldKind::TextList => Value::Array(Vec::new()),
        _ => Value::String(sentinel.to_string()),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_list_resolves() {
        let schema = ExtractionSchema::lesson();
        let value = json!([{"النشاط": "رياضيات"}]);
        let candidates = resolve_candidates(&value, &schema).unwrap();
        assert!(matches!(candidates, Candidates::List(_)));
    }

    #[test]
    fn test_wrapped_list_found_under_any_key() {
        let schema = ExtractionSchema::lesson();
        let value = json!({
            "count": 2,
            "whatever_name": [{"النشاط": "قراءة"}, {"النشاط": "رياضيات"}],
            "note": "done"
        });
        match resolve_candidates(&value, &schema).unwrap() {
            Candidates::Wrapped { key, items } => {
                assert_eq!(key, "whatever_name");
                assert_eq!(items.len(), 2);
            }
            other => panic!("expected wrapped list, got {other:?}"),
        }
    }

    #[test]
    fn test_record_shaped_object_is_single_candidate() {
        let schema = ExtractionSchema::lesson();
        let value = json!({"النشاط": "رياضيات", "الموضوع": "الجمع"});
        let report = validate(&value, &schema).unwrap();
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].text("النشاط"), "رياضيات");
    }

    #[test]
    fn test_listless_unrecognized_object_is_shape_error() {
        let schema = ExtractionSchema::lesson();
        let value = json!({"message": "no data", "ok": false});
        let err = validate(&value, &schema).unwrap_err();
        assert!(err.is_no_structured_data());
    }

    #[test]
    fn test_scalar_value_is_shape_error() {
        let schema = ExtractionSchema::lesson();
        assert!(validate(&json!("just text"), &schema)
            .unwrap_err()
            .is_no_structured_data());
    }

    #[test]
    fn test_missing_field_sentinel_filled_and_kept() {
        let schema = ExtractionSchema::lesson();
        let value = json!([{"النشاط": "رياضيات", "الموضوع": "الجمع"}]);
        let report = validate(&value, &schema).unwrap();
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.incomplete, 1);
        let record = &report.records[0];
        assert!(!record.is_complete());
        assert_eq!(record.text("الكفاءة_القاعدية"), "غير مذكور");
        assert_eq!(record.text("مؤشر_الكفاءة"), "غير مذكور");
        assert_eq!(
            record.missing_fields(),
            &["الكفاءة_القاعدية".to_string(), "مؤشر_الكفاءة".to_string()]
        );
    }

    #[test]
    fn test_non_object_candidate_counted_not_fatal() {
        let schema = ExtractionSchema::lesson();
        let value = json!([
            {"النشاط": "قراءة"},
            "stray string",
            {"النشاط": "رياضيات"}
        ]);
        let report = validate(&value, &schema).unwrap();
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.invalid, 1);
        assert!(report.first_invalid.as_deref().unwrap().contains("candidate 1"));
    }

    #[test]
    fn test_kind_coercion() {
        let schema = ExtractionSchema::movie();
        let value = json!([{
            "title": "Ran",
            "year": "1985",
            "director": "Akira Kurosawa",
            "genres": "drama",
            "review": "A late masterpiece.",
            "score": "nine-ish"
        }]);
        let report = validate(&value, &schema).unwrap();
        let record = &report.records[0];
        assert_eq!(record.get("year"), Some(&json!(1985.0)));
        assert_eq!(record.get("genres"), Some(&json!(["drama"])));
        // unparseable number falls back to the sentinel, record survives
        assert_eq!(record.text("score"), "unspecified");
        assert!(record.is_complete());
    }

    #[test]
    fn test_extra_keys_kept_after_schema_fields() {
        let schema = ExtractionSchema::lesson();
        let value = json!([{"النشاط": "قراءة", "مدة": "45 دقيقة"}]);
        let report = validate(&value, &schema).unwrap();
        let keys: Vec<&str> = report.records[0].fields().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec!["النشاط", "الموضوع", "الكفاءة_القاعدية", "مؤشر_الكفاءة", "مدة"]
        );
    }

    #[test]
    fn test_comparison_wrapper() {
        let subject = ExtractionSchema::movie();
        let summary = ExtractionSchema::movie_comparison();
        let value = json!({
            "movies": [
                {"title": "Ran", "year": 1985, "director": "Akira Kurosawa",
                 "genres": ["drama"], "review": "Vast.", "score": 9.4},
                {"title": "Kagemusha", "year": 17}
            ],
            "comparison": {"winner": "Ran", "rationale": "Wider scope."}
        });
        let report = validate_comparison(&value, &subject, &summary, "movies", "comparison").unwrap();
        assert_eq!(report.subjects.records.len(), 2);
        // the incomplete second record never discards the first
        assert!(report.subjects.records[0].is_complete());
        assert!(!report.subjects.records[1].is_complete());
        assert_eq!(report.summary.as_ref().unwrap().text("winner"), "Ran");
    }

    #[test]
    fn test_comparison_with_renamed_list_key_and_no_summary() {
        let subject = ExtractionSchema::movie();
        let summary = ExtractionSchema::movie_comparison();
        let value = json!({"films": [{"title": "Ikiru"}]});
        let report = validate_comparison(&value, &subject, &summary, "movies", "comparison").unwrap();
        assert_eq!(report.subjects.records.len(), 1);
        assert!(report.summary.is_none());
    }
}
