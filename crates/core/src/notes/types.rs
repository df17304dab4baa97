use serde::Serialize;

/// Attribute name of the note owner.
pub const USER_ID: &str = "UserId";
/// Attribute name of the per-user note number.
pub const NOTE_ID: &str = "NoteId";
/// Attribute name of the note text.
pub const NOTE: &str = "Note";

/// A single note, keyed by `(user_id, note_id)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Note {
    pub user_id: String,
    pub note_id: i64,
    pub note: String,
}

impl Note {
    pub fn new(user_id: impl Into<String>, note_id: i64, note: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            note_id,
            note: note.into(),
        }
    }

    /// Renders the display projection: one JSON object, `NoteId` as a string.
    pub fn to_json_line(&self) -> String {
        let line = NoteLine {
            user_id: &self.user_id,
            note_id: self.note_id.to_string(),
            note: &self.note,
        };
        // Three string fields; serialization cannot fail.
        serde_json::to_string(&line).unwrap_or_default()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct NoteLine<'a> {
    user_id: &'a str,
    note_id: String,
    note: &'a str,
}

/// One batch of notes returned by a single scan call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub notes: Vec<Note>,
    /// Whether the store handed back a continuation token with this page.
    pub has_more: bool,
}

impl Page {
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }
}
