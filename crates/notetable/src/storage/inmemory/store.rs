//! In-memory store implementation.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::ops::Bound;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use notetable_core::notes::{Note, NOTE_ID, USER_ID};
use notetable_core::storage::{
    KeyValue, NoteStore, ScanCursor, ScanOutput, StoreError, StoreResult,
};
use notetable_core::table::{TableDefinition, TableStatus};

/// Remote operations a failure can be injected into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateTable,
    DescribeTable,
    PutNote,
    Scan,
}

#[derive(Debug, Default)]
struct Table {
    /// Statuses handed out by successive describe calls; the last one sticks.
    statuses: VecDeque<TableStatus>,
    notes: BTreeMap<(String, i64), Note>,
}

#[derive(Debug, Default)]
struct State {
    tables: HashMap<String, Table>,
    failures: HashMap<Operation, VecDeque<StoreError>>,
    calls: HashMap<Operation, usize>,
}

/// In-memory storage backend for testing.
///
/// Behaves like a single-region DynamoDB table: puts are upserts keyed by
/// `(UserId, NoteId)`, scans return items in key order and hand back a
/// continuation token whenever a page is full. Table statuses can be
/// scripted and failures injected per operation.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryStore {
    /// Creates a new store with no tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding an active table with the given notes.
    pub async fn with_notes(table_name: &str, notes: impl IntoIterator<Item = Note>) -> Self {
        let store = Self::new();
        {
            let mut state = store.state.write().await;
            let table = state.tables.entry(table_name.to_string()).or_default();
            table.statuses = VecDeque::from([TableStatus::Active]);
            for note in notes {
                table
                    .notes
                    .insert((note.user_id.clone(), note.note_id), note);
            }
        }
        store
    }

    /// Replaces the statuses returned by subsequent describe calls.
    pub async fn script_statuses(&self, table_name: &str, statuses: Vec<TableStatus>) {
        let mut state = self.state.write().await;
        let table = state.tables.entry(table_name.to_string()).or_default();
        table.statuses = statuses.into();
    }

    /// Makes the next call to `operation` fail with `error`.
    ///
    /// Failures queue up; each call consumes one.
    pub async fn fail_next(&self, operation: Operation, error: StoreError) {
        let mut state = self.state.write().await;
        state.failures.entry(operation).or_default().push_back(error);
    }

    /// Number of calls made to `operation`, including failed ones.
    pub async fn calls(&self, operation: Operation) -> usize {
        let state = self.state.read().await;
        state.calls.get(&operation).copied().unwrap_or(0)
    }

    /// All notes in a table, in key order.
    pub async fn notes(&self, table_name: &str) -> Vec<Note> {
        let state = self.state.read().await;
        state
            .tables
            .get(table_name)
            .map(|t| t.notes.values().cloned().collect())
            .unwrap_or_default()
    }
}

impl State {
    /// Counts the call and pops an injected failure, if any.
    fn begin(&mut self, operation: Operation) -> StoreResult<()> {
        *self.calls.entry(operation).or_default() += 1;
        match self.failures.get_mut(&operation).and_then(|q| q.pop_front()) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn not_found(table_name: &str) -> StoreError {
    StoreError::NotFound(format!("Table not found: {}", table_name))
}

fn cursor_for(note: &Note) -> ScanCursor {
    ScanCursor::new()
        .with(USER_ID, KeyValue::S(note.user_id.clone()))
        .with(NOTE_ID, KeyValue::N(note.note_id.to_string()))
}

fn key_from_cursor(cursor: &ScanCursor) -> StoreResult<(String, i64)> {
    match (cursor.get(USER_ID), cursor.get(NOTE_ID)) {
        (Some(KeyValue::S(user_id)), Some(KeyValue::N(note_id))) => {
            let note_id = note_id
                .parse()
                .map_err(|_| StoreError::Rejected(format!("Invalid start key: {}", note_id)))?;
            Ok((user_id.clone(), note_id))
        }
        _ => Err(StoreError::Rejected("Invalid start key".to_string())),
    }
}

#[async_trait]
impl NoteStore for InMemoryStore {
    async fn create_table(&self, definition: &TableDefinition) -> StoreResult<TableStatus> {
        let mut state = self.state.write().await;
        state.begin(Operation::CreateTable)?;

        if state.tables.contains_key(&definition.name) {
            return Err(StoreError::Rejected(format!(
                "Table already exists: {}",
                definition.name
            )));
        }

        state.tables.insert(
            definition.name.clone(),
            Table {
                statuses: VecDeque::from([TableStatus::Creating, TableStatus::Active]),
                notes: BTreeMap::new(),
            },
        );
        Ok(TableStatus::Creating)
    }

    async fn describe_table(&self, table_name: &str) -> StoreResult<TableStatus> {
        let mut state = self.state.write().await;
        state.begin(Operation::DescribeTable)?;

        let table = state
            .tables
            .get_mut(table_name)
            .ok_or_else(|| not_found(table_name))?;
        let status = if table.statuses.len() > 1 {
            table.statuses.pop_front()
        } else {
            table.statuses.front().cloned()
        };
        Ok(status.unwrap_or(TableStatus::Active))
    }

    async fn put_note(&self, table_name: &str, note: &Note) -> StoreResult<()> {
        let mut state = self.state.write().await;
        state.begin(Operation::PutNote)?;

        let table = state
            .tables
            .get_mut(table_name)
            .ok_or_else(|| not_found(table_name))?;
        table
            .notes
            .insert((note.user_id.clone(), note.note_id), note.clone());
        Ok(())
    }

    async fn scan_page(
        &self,
        table_name: &str,
        limit: u32,
        start: Option<ScanCursor>,
    ) -> StoreResult<ScanOutput> {
        let mut state = self.state.write().await;
        state.begin(Operation::Scan)?;

        if limit == 0 {
            return Err(StoreError::Rejected("Limit must be at least 1".to_string()));
        }
        let table = state
            .tables
            .get(table_name)
            .ok_or_else(|| not_found(table_name))?;

        let notes: Vec<Note> = match start {
            Some(cursor) => {
                let after = key_from_cursor(&cursor)?;
                table
                    .notes
                    .range((Bound::Excluded(after), Bound::Unbounded))
                    .map(|(_, note)| note.clone())
                    .take(limit as usize)
                    .collect()
            }
            None => table.notes.values().take(limit as usize).cloned().collect(),
        };

        // Like DynamoDB, a full page always carries a token, even when it
        // happens to end exactly at the last item.
        let next = if notes.len() == limit as usize {
            notes.last().map(cursor_for)
        } else {
            None
        };

        Ok(ScanOutput { notes, next })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notetable_core::table::{AttributeType, KeyAttribute, Throughput};

    fn definition(name: &str) -> TableDefinition {
        TableDefinition {
            name: name.to_string(),
            partition_key: KeyAttribute {
                name: "UserId".to_string(),
                attribute_type: AttributeType::String,
            },
            sort_key: KeyAttribute {
                name: "NoteId".to_string(),
                attribute_type: AttributeType::Number,
            },
            throughput: Throughput {
                read_capacity_units: 1,
                write_capacity_units: 1,
            },
        }
    }

    #[tokio::test]
    async fn test_create_then_describe_becomes_active() {
        let store = InMemoryStore::new();
        let status = store.create_table(&definition("Notes")).await.unwrap();
        assert_eq!(status, TableStatus::Creating);

        assert_eq!(
            store.describe_table("Notes").await.unwrap(),
            TableStatus::Creating
        );
        assert_eq!(
            store.describe_table("Notes").await.unwrap(),
            TableStatus::Active
        );
        assert_eq!(
            store.describe_table("Notes").await.unwrap(),
            TableStatus::Active
        );
    }

    #[tokio::test]
    async fn test_create_existing_table_is_rejected() {
        let store = InMemoryStore::new();
        store.create_table(&definition("Notes")).await.unwrap();
        let result = store.create_table(&definition("Notes")).await;
        assert!(matches!(result, Err(StoreError::Rejected(_))));
    }

    #[tokio::test]
    async fn test_describe_missing_table() {
        let store = InMemoryStore::new();
        let result = store.describe_table("Nope").await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_put_is_an_upsert() {
        let store = InMemoryStore::with_notes("Notes", Vec::<Note>::new()).await;
        store
            .put_note("Notes", &Note::new("u1", 1, "first"))
            .await
            .unwrap();
        store
            .put_note("Notes", &Note::new("u1", 1, "second"))
            .await
            .unwrap();

        assert_eq!(
            store.notes("Notes").await,
            vec![Note::new("u1", 1, "second")]
        );
        assert_eq!(store.calls(Operation::PutNote).await, 2);
    }

    #[tokio::test]
    async fn test_scan_pages_in_key_order() {
        let store = InMemoryStore::with_notes(
            "Notes",
            [
                Note::new("b", 1, "b1"),
                Note::new("a", 2, "a2"),
                Note::new("a", 1, "a1"),
            ],
        )
        .await;

        let first = store.scan_page("Notes", 2, None).await.unwrap();
        assert_eq!(
            first.notes,
            vec![Note::new("a", 1, "a1"), Note::new("a", 2, "a2")]
        );
        assert!(first.next.is_some());

        let second = store.scan_page("Notes", 2, first.next).await.unwrap();
        assert_eq!(second.notes, vec![Note::new("b", 1, "b1")]);
        assert!(second.next.is_none());
    }

    #[tokio::test]
    async fn test_full_last_page_yields_trailing_empty_page() {
        let store =
            InMemoryStore::with_notes("Notes", [Note::new("a", 1, "x"), Note::new("a", 2, "y")])
                .await;

        let first = store.scan_page("Notes", 2, None).await.unwrap();
        assert_eq!(first.notes.len(), 2);
        let second = store.scan_page("Notes", 2, first.next).await.unwrap();
        assert!(second.notes.is_empty());
        assert!(second.next.is_none());
    }

    #[tokio::test]
    async fn test_injected_failure_is_consumed_once() {
        let store = InMemoryStore::with_notes("Notes", Vec::<Note>::new()).await;
        store
            .fail_next(Operation::Scan, StoreError::Throttled("slow".to_string()))
            .await;

        assert!(store.scan_page("Notes", 1, None).await.is_err());
        assert!(store.scan_page("Notes", 1, None).await.is_ok());
        assert_eq!(store.calls(Operation::Scan).await, 2);
    }
}
