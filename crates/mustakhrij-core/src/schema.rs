//! Extraction schemas: the required-field contract a model reply must satisfy

use serde::Deserialize;
use serde::Serialize;

/// Semantic kind of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// A short free-text value (a name, a title)
    ShortText,
    /// A longer free-text value (a description, a critique)
    LongText,
    /// A list of short text values
    TextList,
    /// A numeric value
    Number,
}

/// One required field of an extraction schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name as it must appear in the model's JSON output
    pub name: String,
    /// Semantic kind of the field
    pub kind: FieldKind,
}

impl FieldSpec {
    /// Create a field spec
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// A named, ordered set of required fields. Immutable for the duration of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionSchema {
    /// Schema name (used in logs and prompts)
    pub name: String,
    /// Required fields in output order
    pub fields: Vec<FieldSpec>,
    /// Marker written in place of a missing required field
    pub sentinel: String,
}

impl ExtractionSchema {
    /// Create a schema from a field list
    pub fn new(
        name: impl Into<String>,
        sentinel: impl Into<String>,
        fields: Vec<FieldSpec>,
    ) -> Self {
        Self {
            name: name.into(),
            fields,
            sentinel: sentinel.into(),
        }
    }

    /// Schema for one lesson record extracted from Algerian teaching notes
    pub fn lesson() -> Self {
        Self::new(
            "lesson",
            "غير مذكور",
            vec![
                FieldSpec::new("النشاط", FieldKind::ShortText),
                FieldSpec::new("الموضوع", FieldKind::ShortText),
                FieldSpec::new("الكفاءة_القاعدية", FieldKind::LongText),
                FieldSpec::new("مؤشر_الكفاءة", FieldKind::LongText),
            ],
        )
    }

    /// Schema for one structured movie critique record
    pub fn movie() -> Self {
        Self::new(
            "movie",
            "unspecified",
            vec![
                FieldSpec::new("title", FieldKind::ShortText),
                FieldSpec::new("year", FieldKind::Number),
                FieldSpec::new("director", FieldKind::ShortText),
                FieldSpec::new("genres", FieldKind::TextList),
                FieldSpec::new("review", FieldKind::LongText),
                FieldSpec::new("score", FieldKind::Number),
            ],
        )
    }

    /// Schema for the single summary record of a comparison-mode reply
    pub fn movie_comparison() -> Self {
        Self::new(
            "movie_comparison",
            "unspecified",
            vec![
                FieldSpec::new("winner", FieldKind::ShortText),
                FieldSpec::new("rationale", FieldKind::LongText),
            ],
        )
    }

    /// Names of the required fields, in schema order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Whether `name` is one of the required fields
    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    /// Look up a required field by name
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}
