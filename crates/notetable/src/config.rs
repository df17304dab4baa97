use std::path::{Path, PathBuf};

use notetable_core::settings::Settings;

use crate::error::{Result, WorkflowError};

/// Default settings file, resolved against the working directory.
pub const DEFAULT_SETTINGS_PATH: &str = "appsettings.json";

/// Reads and validates the `DynamoDB` section of the settings file.
///
/// Runs before any client is created, so a bad file never reaches the store.
pub async fn load_settings(path: &Path) -> Result<Settings> {
    let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
        WorkflowError::Configuration(format!(
            "cannot read settings file {}: {}",
            path.display(),
            e
        ))
    })?;

    let settings = Settings::from_json(&contents)?;
    tracing::debug!(path = %path.display(), table = %settings.table_name, "Loaded settings");

    Ok(settings)
}

/// Resolves the notes file named in the settings.
pub fn source_notes_path(settings: &Settings) -> PathBuf {
    PathBuf::from(&settings.source_notes)
}
