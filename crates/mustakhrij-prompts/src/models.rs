//! Data models for prompt templates

use mustakhrij_core::schema::ExtractionSchema;
use serde::Deserialize;
use serde::Serialize;

/// Character budget for the embedded subject text. Hosted models cap the
/// context window; anything beyond this is cut before the prompt is built.
pub const SUBJECT_CHAR_BUDGET: usize = 25_000;

/// Cut text to at most `budget` characters, on a character boundary
#[must_use]
pub fn truncate_chars(text: &str, budget: usize) -> &str {
    match text.char_indices().nth(budget) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Context for the lesson-extraction system instruction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonSystemContext {
    /// Required field names, in output order
    pub fields: Vec<String>,
    /// Marker for missing information
    pub sentinel: String,
}

impl LessonSystemContext {
    /// Build the context from a schema
    #[must_use]
    pub fn new(schema: &ExtractionSchema) -> Self {
        Self {
            fields: schema.field_names().map(str::to_string).collect(),
            sentinel: schema.sentinel.clone(),
        }
    }
}

/// Context carrying the subject text, truncated at construction so the
/// rendered prompt can never exceed the budget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectContext {
    /// The truncated subject text
    pub subject: String,
}

impl SubjectContext {
    /// Truncate to the default budget
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self::with_budget(text, SUBJECT_CHAR_BUDGET)
    }

    /// Truncate to an explicit budget
    #[must_use]
    pub fn with_budget(text: &str, budget: usize) -> Self {
        Self {
            subject: truncate_chars(text, budget).to_string(),
        }
    }
}

/// Context for the per-schema sentinel in the movie templates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentinelContext {
    /// Marker for unknown details
    pub sentinel: String,
}

impl SentinelContext {
    /// Build the context from a schema
    #[must_use]
    pub fn new(schema: &ExtractionSchema) -> Self {
        Self {
            sentinel: schema.sentinel.clone(),
        }
    }
}

/// Context for a single movie-report user message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieUserContext {
    /// The film title as the user typed it
    pub title: String,
}

/// Context for the comparison-mode user message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonUserContext {
    /// The film titles, in user order
    pub titles: Vec<String>,
}
