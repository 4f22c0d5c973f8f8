//! Extracted records: validated field maps produced from model output

use serde::Serialize;
use serde_json::Value;

/// One validated record. Every required field of the schema that produced it
/// is present; fields the model omitted carry the schema's sentinel and are
/// listed in `missing`. Records are not mutated after creation.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractedRecord {
    fields: Vec<(String, Value)>,
    missing: Vec<String>,
}

impl ExtractedRecord {
    /// Assemble a record from its fields and the names that were sentinel-filled
    pub fn new(fields: Vec<(String, Value)>, missing: Vec<String>) -> Self {
        Self { fields, missing }
    }

    /// Value of a field by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    /// Display form of a field: strings as-is, numbers formatted,
    /// lists joined with `"، "`, absent fields as the empty string
    pub fn text(&self, name: &str) -> String {
        match self.get(name) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Array(items)) => {
                let parts: Vec<String> = items
                    .iter()
                    .map(|v| match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect();
                parts.join("، ")
            }
            Some(Value::Bool(b)) => b.to_string(),
            Some(Value::Null) | Some(Value::Object(_)) | None => String::new(),
        }
    }

    /// Whether every required field carried a real value
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// Names of the fields that were sentinel-filled
    pub fn missing_fields(&self) -> &[String] {
        &self.missing
    }

    /// Fields in output order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Render the record as a JSON object in field order
    pub fn to_json(&self) -> Value {
        let mut map = serde_json::Map::new();
        for (k, v) in &self.fields {
            map.insert(k.clone(), v.clone());
        }
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ExtractedRecord {
        ExtractedRecord::new(
            vec![
                ("title".to_string(), json!("Ran")),
                ("year".to_string(), json!(1985)),
                ("genres".to_string(), json!(["drama", "war"])),
                ("director".to_string(), json!("unspecified")),
            ],
            vec!["director".to_string()],
        )
    }

    #[test]
    fn test_field_access() {
        let record = sample();
        assert_eq!(record.get("title"), Some(&json!("Ran")));
        assert_eq!(record.text("year"), "1985");
        assert_eq!(record.text("genres"), "drama، war");
        assert_eq!(record.text("plot"), "");
    }

    #[test]
    fn test_completeness() {
        let record = sample();
        assert!(!record.is_complete());
        assert_eq!(record.missing_fields(), &["director".to_string()]);
    }

    #[test]
    fn test_to_json_keeps_field_order() {
        let record = sample();
        let value = record.to_json();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["title", "year", "genres", "director"]);
    }
}
