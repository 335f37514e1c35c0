//! Error types for selgen

use thiserror::Error;

/// Result type for selgen operations.
pub type GenResult<T> = Result<T, GenError>;

/// Error type for selgen operations.
#[derive(Debug, Error)]
pub enum GenError {
    /// A template element did not have the shape a plugin relies on.
    #[error("Structure error in <{element}>: {message}")]
    Structure { element: String, message: String },
    /// A guarded column could not be recovered from its SQL text.
    #[error("Field name error: cannot extract a field name from {text:?}")]
    FieldName { text: String },
    /// Table metadata is inconsistent (e.g. unknown primary key column).
    #[error("Table error for '{table}': {message}")]
    Table { table: String, message: String },
    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Other errors.
    #[error("{0}")]
    Other(String),
}

impl GenError {
    /// Create a structure error for the given element tag.
    pub fn structure(element: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Structure {
            element: element.into(),
            message: message.into(),
        }
    }

    /// Create a table metadata error.
    pub fn table(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Table {
            table: table.into(),
            message: message.into(),
        }
    }
}
