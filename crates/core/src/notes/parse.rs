//! Note record parsing.
//!
//! The notes file is a JSON array of objects. `NoteId` is transmitted as a
//! string even though it denotes an integer.

use serde_json::Value;

use super::error::NotesError;
use super::types::{Note, NOTE, NOTE_ID, USER_ID};

/// Parses a notes document into its raw records.
///
/// Only the document shape is checked here; records are validated one at a
/// time by [`note_from_record`] so that a bad record stops a load at that
/// record instead of before the first one.
pub fn parse_records(json: &str) -> Result<Vec<Value>, NotesError> {
    match serde_json::from_str::<Value>(json) {
        Ok(Value::Array(records)) => Ok(records),
        Ok(_) => Err(NotesError::NotAnArray),
        Err(e) => Err(NotesError::Malformed(e.to_string())),
    }
}

/// Extracts a note from the record at `index`.
pub fn note_from_record(index: usize, record: &Value) -> Result<Note, NotesError> {
    Ok(Note {
        user_id: string_field(index, record, USER_ID)?,
        note_id: integer_field(index, record, NOTE_ID)?,
        note: string_field(index, record, NOTE)?,
    })
}

fn field<'a>(index: usize, record: &'a Value, name: &'static str) -> Result<&'a Value, NotesError> {
    match record.get(name) {
        Some(Value::Null) | None => Err(NotesError::FieldMissing { index, field: name }),
        Some(value) => Ok(value),
    }
}

fn string_field(index: usize, record: &Value, name: &'static str) -> Result<String, NotesError> {
    match field(index, record, name)? {
        Value::String(s) => Ok(s.clone()),
        other => Err(NotesError::InvalidField {
            index,
            field: name,
            reason: format!("expected a string, got {}", other),
        }),
    }
}

fn integer_field(index: usize, record: &Value, name: &'static str) -> Result<i64, NotesError> {
    let value = field(index, record, name)?;
    let parsed = match value {
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Number(n) => n.as_i64(),
        _ => None,
    };

    parsed.ok_or_else(|| NotesError::InvalidField {
        index,
        field: name,
        reason: format!("expected an integer, got {}", value),
    })
}
