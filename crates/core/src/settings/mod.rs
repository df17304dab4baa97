//! Settings schema for the `DynamoDB` section of the settings file.

mod error;

pub use error::SettingsError;

use serde::Deserialize;

use crate::table::{AttributeType, KeyAttribute, TableDefinition, Throughput};

/// Name of the settings section holding the table configuration.
pub const SECTION: &str = "DynamoDB";

/// Table, input and scan settings shared by every workflow.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Settings {
    pub table_name: String,
    pub partition_key: String,
    pub sort_key: String,
    pub read_capacity: i64,
    pub write_capacity: i64,
    /// Path of the notes file, relative to the working directory.
    #[serde(rename = "Sourcenotes")]
    pub source_notes: String,
    pub page_size: u32,
}

#[derive(Debug, Deserialize)]
struct SettingsDocument {
    #[serde(rename = "DynamoDB")]
    dynamodb: Option<Settings>,
}

impl Settings {
    /// Parses and validates a settings document.
    ///
    /// The document is a JSON object with a `DynamoDB` section. Every field in
    /// the section is required.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let document: SettingsDocument =
            serde_json::from_str(json).map_err(|e| SettingsError::Malformed(e.to_string()))?;

        let settings = document
            .dynamodb
            .ok_or(SettingsError::MissingSection(SECTION))?;
        settings.validate()?;

        Ok(settings)
    }

    /// Checks the values serde cannot check on its own.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let non_empty = [
            ("TableName", &self.table_name),
            ("PartitionKey", &self.partition_key),
            ("SortKey", &self.sort_key),
            ("Sourcenotes", &self.source_notes),
        ];
        for (field, value) in non_empty {
            if value.trim().is_empty() {
                return Err(SettingsError::Invalid {
                    field,
                    reason: "must not be empty",
                });
            }
        }

        if self.partition_key == self.sort_key {
            return Err(SettingsError::Invalid {
                field: "SortKey",
                reason: "must differ from PartitionKey",
            });
        }

        let positive = [
            ("ReadCapacity", self.read_capacity),
            ("WriteCapacity", self.write_capacity),
            ("PageSize", i64::from(self.page_size)),
        ];
        for (field, value) in positive {
            if value < 1 {
                return Err(SettingsError::Invalid {
                    field,
                    reason: "must be at least 1",
                });
            }
        }

        Ok(())
    }

    /// Builds the table definition: string partition key, numeric sort key.
    pub fn table_definition(&self) -> TableDefinition {
        TableDefinition {
            name: self.table_name.clone(),
            partition_key: KeyAttribute {
                name: self.partition_key.clone(),
                attribute_type: AttributeType::String,
            },
            sort_key: KeyAttribute {
                name: self.sort_key.clone(),
                attribute_type: AttributeType::Number,
            },
            throughput: Throughput {
                read_capacity_units: self.read_capacity,
                write_capacity_units: self.write_capacity,
            },
        }
    }
}
