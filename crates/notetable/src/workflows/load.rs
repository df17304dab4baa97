//! Bulk loading of notes from a JSON file.

use std::io::Write;
use std::path::Path;

use notetable_core::notes::{note_from_record, parse_records};
use notetable_core::storage::NoteStore;
use serde_json::Value;

use super::retry::with_retry;
use super::WorkflowContext;
use crate::error::{Result, WorkflowError};

/// Result of a load run.
///
/// Loading stops at the first failing record; everything before it stays
/// stored.
#[derive(Debug)]
pub struct LoadOutcome {
    pub inserted: usize,
    pub failure: Option<WorkflowError>,
}

impl LoadOutcome {
    /// Returns the inserted count, or the failure that stopped the run.
    pub fn into_result(self) -> Result<usize> {
        match self.failure {
            Some(err) => Err(err),
            None => Ok(self.inserted),
        }
    }
}

/// Reads `path` as a JSON array of note records.
pub async fn read_records(path: &Path) -> Result<Vec<Value>> {
    let contents = tokio::fs::read_to_string(path).await.map_err(|err| {
        WorkflowError::Parse(format!("cannot read {}: {}", path.display(), err))
    })?;
    let records = parse_records(&contents)?;
    tracing::debug!(path = %path.display(), count = records.len(), "Read note records");
    Ok(records)
}

/// Inserts `records` one at a time, in order.
pub async fn load_notes(
    store: &dyn NoteStore,
    ctx: &WorkflowContext,
    table_name: &str,
    records: &[Value],
    out: &mut impl Write,
) -> LoadOutcome {
    let mut inserted = 0;

    for (index, record) in records.iter().enumerate() {
        if let Err(err) = load_one(store, ctx, table_name, index, record, out).await {
            tracing::warn!(table = %table_name, index, error = %err, "Stopping load");
            return LoadOutcome {
                inserted,
                failure: Some(err),
            };
        }
        inserted += 1;
    }

    LoadOutcome {
        inserted,
        failure: None,
    }
}

async fn load_one(
    store: &dyn NoteStore,
    ctx: &WorkflowContext,
    table_name: &str,
    index: usize,
    record: &Value,
    out: &mut impl Write,
) -> Result<()> {
    writeln!(out, "Loading note {}", record)?;
    let note = note_from_record(index, record)?;
    with_retry(ctx, "PutItem", || store.put_note(table_name, &note)).await
}
