//! Pure functions over table definitions and statuses.

use super::types::{Readiness, TableDefinition, TableStatus};

/// Classifies a table status for the wait loop.
///
/// Statuses the store may add later are treated as pending; the wait loop is
/// bounded, so an unrecognized status ends in a timeout rather than a hang.
pub fn readiness(status: &TableStatus) -> Readiness {
    match status {
        TableStatus::Active => Readiness::Ready,
        TableStatus::Creating | TableStatus::Updating | TableStatus::Unknown(_) => {
            Readiness::Pending
        }
        TableStatus::Deleting
        | TableStatus::Archiving
        | TableStatus::Archived
        | TableStatus::InaccessibleEncryptionCredentials => Readiness::Failed,
    }
}

/// Formats a table definition for display before creation.
pub fn format_definition(definition: &TableDefinition) -> Vec<String> {
    vec![
        format!("+ Create table: {}", definition.name),
        format!(
            "  Partition key: {} ({})",
            definition.partition_key.name,
            definition.partition_key.attribute_type.code()
        ),
        format!(
            "  Sort key: {} ({})",
            definition.sort_key.name,
            definition.sort_key.attribute_type.code()
        ),
        format!(
            "  Throughput: {} read / {} write",
            definition.throughput.read_capacity_units, definition.throughput.write_capacity_units
        ),
    ]
}
