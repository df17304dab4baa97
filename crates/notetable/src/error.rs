//! Error types for the notes workflows.

use std::time::Duration;

use notetable_core::notes::NotesError;
use notetable_core::settings::SettingsError;
use notetable_core::storage::StoreError;
use thiserror::Error;

/// Result type alias for workflow operations.
pub type Result<T> = std::result::Result<T, WorkflowError>;

/// Errors that end a workflow.
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Failed to provision table '{table_name}': {reason}")]
    Provisioning { table_name: String, reason: String },

    #[error("Table '{table_name}' did not become active after {attempts} checks ({waited:?})")]
    ProvisioningTimeout {
        table_name: String,
        attempts: u32,
        waited: Duration,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Note #{index} is missing required field '{field}'")]
    FieldMissing { index: usize, field: &'static str },

    #[error("DynamoDB call failed: {0}")]
    Remote(#[from] StoreError),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SettingsError> for WorkflowError {
    fn from(err: SettingsError) -> Self {
        WorkflowError::Configuration(err.to_string())
    }
}

impl From<NotesError> for WorkflowError {
    fn from(err: NotesError) -> Self {
        match err {
            NotesError::FieldMissing { index, field } => {
                WorkflowError::FieldMissing { index, field }
            }
            other => WorkflowError::Parse(other.to_string()),
        }
    }
}
