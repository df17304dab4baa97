mod error;
mod parse;
mod types;

pub use error::NotesError;
pub use parse::{note_from_record, parse_records};
pub use types::{Note, Page, NOTE, NOTE_ID, USER_ID};
