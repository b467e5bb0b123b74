//! Structured error types for document rendering.
//!
//! Every fatal failure a render request can hit maps onto one variant here.
//! Asset lookups are deliberately absent: a missing logo or diagram only drops
//! that element from the page.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::DocumentKind;

/// The unified error type returned by all public rendering functions.
#[derive(Debug, Error)]
pub enum DocError {
    /// The request JSON itself failed to parse.
    #[error("Failed to parse request: {source}{}", hint_suffix(.hint))]
    ParseError {
        #[source]
        source: serde_json::Error,
        hint: String,
    },

    /// The `type` discriminator names no known document kind.
    #[error("Unknown document type: {0}")]
    UnknownKind(String),

    /// A field the chosen document kind requires is absent or null.
    #[error("{kind} record is missing required field `{field}`")]
    MissingField { kind: DocumentKind, field: String },

    /// All required fields are present but the record has the wrong shape.
    #[error("Invalid {kind} record: {source}")]
    InvalidRecord {
        kind: DocumentKind,
        #[source]
        source: serde_json::Error,
    },

    /// Writing the finished document failed.
    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The render configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(String),
}

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl From<serde_json::Error> for DocError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the request schema. Expected `type`, `data` and optionally `outputFile`.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input, is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        DocError::ParseError { source: e, hint }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_carries_hint() {
        let err: DocError = serde_json::from_str::<serde_json::Value>("{\"a\": 1,}")
            .unwrap_err()
            .into();
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to parse request"));
        assert!(msg.contains("trailing commas"));
    }

    #[test]
    fn test_missing_field_names_kind_and_path() {
        let err = DocError::MissingField {
            kind: DocumentKind::JobSheet,
            field: "vehicle.reg".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "jobsheet record is missing required field `vehicle.reg`"
        );
    }

    #[test]
    fn test_unknown_kind_message() {
        let err = DocError::UnknownKind("receipt".to_string());
        assert_eq!(err.to_string(), "Unknown document type: receipt");
    }
}
