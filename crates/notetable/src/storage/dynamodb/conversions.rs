//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between DynamoDB AttributeValue maps and the
//! core note types. These are testable in isolation without DynamoDB access.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::{AttributeValue, ScalarAttributeType, TableStatus as SdkTableStatus};
use notetable_core::notes::{Note, NOTE, NOTE_ID, USER_ID};
use notetable_core::storage::{KeyValue, ScanCursor, StoreError};
use notetable_core::table::{AttributeType, TableStatus};

// ============================================================================
// Note conversions
// ============================================================================

/// Convert a Note to a DynamoDB item.
pub fn note_to_item(note: &Note) -> HashMap<String, AttributeValue> {
    let mut item = HashMap::new();
    item.insert(USER_ID.to_string(), AttributeValue::S(note.user_id.clone()));
    item.insert(
        NOTE_ID.to_string(),
        AttributeValue::N(note.note_id.to_string()),
    );
    item.insert(NOTE.to_string(), AttributeValue::S(note.note.clone()));
    item
}

/// Convert a DynamoDB item to a Note.
pub fn item_to_note(item: &HashMap<String, AttributeValue>) -> Result<Note, StoreError> {
    Ok(Note {
        user_id: get_string(item, USER_ID)?,
        note_id: get_i64(item, NOTE_ID)?,
        note: get_string(item, NOTE)?,
    })
}

fn get_string(item: &HashMap<String, AttributeValue>, key: &str) -> Result<String, StoreError> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .cloned()
        .ok_or_else(|| StoreError::InvalidData(format!("Missing or invalid string field: {}", key)))
}

fn get_i64(item: &HashMap<String, AttributeValue>, key: &str) -> Result<i64, StoreError> {
    item.get(key)
        .and_then(|v| v.as_n().ok())
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| StoreError::InvalidData(format!("Missing or invalid number field: {}", key)))
}

// ============================================================================
// Continuation tokens
// ============================================================================

/// Convert a scan cursor to an `ExclusiveStartKey`.
pub fn cursor_to_key(cursor: &ScanCursor) -> HashMap<String, AttributeValue> {
    cursor
        .iter()
        .map(|(name, value)| {
            let value = match value {
                KeyValue::S(s) => AttributeValue::S(s.clone()),
                KeyValue::N(n) => AttributeValue::N(n.clone()),
            };
            (name.clone(), value)
        })
        .collect()
}

/// Convert a `LastEvaluatedKey` to a scan cursor.
///
/// An absent or empty key means the scan is complete.
pub fn key_to_cursor(
    key: Option<HashMap<String, AttributeValue>>,
) -> Result<Option<ScanCursor>, StoreError> {
    let Some(key) = key.filter(|k| !k.is_empty()) else {
        return Ok(None);
    };

    key.into_iter()
        .map(|(name, value)| match value {
            AttributeValue::S(s) => Ok((name, KeyValue::S(s))),
            AttributeValue::N(n) => Ok((name, KeyValue::N(n))),
            other => Err(StoreError::InvalidData(format!(
                "Unsupported key type for '{}': {:?}",
                name, other
            ))),
        })
        .collect::<Result<ScanCursor, _>>()
        .map(Some)
}

// ============================================================================
// Table metadata
// ============================================================================

pub fn to_scalar_type(attr_type: AttributeType) -> ScalarAttributeType {
    match attr_type {
        AttributeType::String => ScalarAttributeType::S,
        AttributeType::Number => ScalarAttributeType::N,
    }
}

pub fn to_table_status(status: &SdkTableStatus) -> TableStatus {
    match status {
        SdkTableStatus::Active => TableStatus::Active,
        SdkTableStatus::Creating => TableStatus::Creating,
        SdkTableStatus::Updating => TableStatus::Updating,
        SdkTableStatus::Deleting => TableStatus::Deleting,
        SdkTableStatus::Archiving => TableStatus::Archiving,
        SdkTableStatus::Archived => TableStatus::Archived,
        SdkTableStatus::InaccessibleEncryptionCredentials => {
            TableStatus::InaccessibleEncryptionCredentials
        }
        other => TableStatus::Unknown(other.as_str().to_string()),
    }
}
