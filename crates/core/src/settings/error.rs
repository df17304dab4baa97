use thiserror::Error;

/// Errors that can occur when reading or validating settings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Settings are not valid JSON: {0}")]
    Malformed(String),
    #[error("Settings section '{0}' is missing")]
    MissingSection(&'static str),
    #[error("Setting '{field}' is invalid: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}
