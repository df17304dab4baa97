//! Storage backends implementing `NoteStore`.

pub mod dynamodb;
#[cfg(test)]
pub mod inmemory;
