use thiserror::Error;

/// Errors that can occur when reading note records from a document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotesError {
    #[error("Notes document is not valid JSON: {0}")]
    Malformed(String),
    #[error("Notes document must be a JSON array")]
    NotAnArray,
    #[error("Note #{index} is missing required field '{field}'")]
    FieldMissing { index: usize, field: &'static str },
    #[error("Note #{index} has an invalid '{field}': {reason}")]
    InvalidField {
        index: usize,
        field: &'static str,
        reason: String,
    },
}
