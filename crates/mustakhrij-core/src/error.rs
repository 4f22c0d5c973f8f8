//! Error types for Mustakhrij

use thiserror::Error;

/// Main error type for Mustakhrij operations
#[derive(Error, Debug)]
pub enum Error {
    /// Transport or timeout failure on an HTTP dependency
    #[error("Network error: {0}")]
    Network(String),

    /// The model reply contained no parseable JSON
    #[error("Extraction failed: no parseable JSON in model reply")]
    ExtractionFailed {
        /// The raw model text, kept so the caller can show it for diagnosis
        raw: String,
    },

    /// JSON parsed, but no list-shaped payload could be located
    #[error("No structured data found: {0}")]
    NoStructuredData(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Record store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Word document read/write errors
    #[error("Document error: {0}")]
    Document(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for Mustakhrij operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a document error
    pub fn document(msg: impl Into<String>) -> Self {
        Self::Document(msg.into())
    }

    /// The raw model text attached to an extraction failure, if any
    pub fn raw_reply(&self) -> Option<&str> {
        match self {
            Self::ExtractionFailed { raw } => Some(raw),
            _ => None,
        }
    }

    /// Check if this is a JSON-syntax failure (as opposed to a shape failure)
    pub fn is_extraction_failed(&self) -> bool {
        matches!(self, Self::ExtractionFailed { .. })
    }

    /// Check if this is a JSON-shape failure
    pub fn is_no_structured_data(&self) -> bool {
        matches!(self, Self::NoStructuredData(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::network("connection refused");
        assert_eq!(err.to_string(), "Network error: connection refused");

        let err = Error::NoStructuredData("object holds no list".to_string());
        assert!(err.is_no_structured_data());
        assert!(!err.is_extraction_failed());
    }

    #[test]
    fn test_raw_reply_attached() {
        let err = Error::ExtractionFailed {
            raw: "sorry, I cannot".to_string(),
        };
        assert!(err.is_extraction_failed());
        assert_eq!(err.raw_reply(), Some("sorry, I cannot"));

        let err = Error::configuration("missing key");
        assert_eq!(err.raw_reply(), None);
    }

    #[test]
    fn test_error_from_traits() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
