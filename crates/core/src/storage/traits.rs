use async_trait::async_trait;

use crate::notes::Note;
use crate::table::{TableDefinition, TableStatus};

use super::{ScanCursor, ScanOutput, StoreResult};

/// Remote operations the notes workflows need from a key-value store.
///
/// Each method is a single remote call; retries, polling and cancellation
/// live in the caller.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Issues a table creation request and returns the reported status.
    async fn create_table(&self, definition: &TableDefinition) -> StoreResult<TableStatus>;

    /// Fetches the current status of a table.
    async fn describe_table(&self, table_name: &str) -> StoreResult<TableStatus>;

    /// Writes a note, replacing any note with the same key.
    async fn put_note(&self, table_name: &str, note: &Note) -> StoreResult<()>;

    /// Reads up to `limit` notes starting after `start`.
    async fn scan_page(
        &self,
        table_name: &str,
        limit: u32,
        start: Option<ScanCursor>,
    ) -> StoreResult<ScanOutput>;
}
