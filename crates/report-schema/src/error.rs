//! Schema Validation Error Types

use thiserror::Error;

/// Errors while validating a raw record against the schema
#[derive(Debug, Clone, Error)]
pub enum SchemaError {
    /// Record is missing a required field
    #[error("missing required field: {0}")]
    MissingField(String),

    /// Field value has the wrong coarse type (number vs text)
    #[error("field {field} has wrong type: expected {expected}, got {actual}")]
    WrongType {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// Record is not a JSON object
    #[error("malformed record: {0}")]
    Malformed(String),
}
