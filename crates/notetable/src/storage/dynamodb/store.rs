//! DynamoDB store implementation.
//!
//! Implements `NoteStore` from `notetable_core::storage` using DynamoDB.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, KeySchemaElement, KeyType, ProvisionedThroughput,
};
use aws_sdk_dynamodb::Client;

use notetable_core::notes::Note;
use notetable_core::storage::{NoteStore, ScanCursor, ScanOutput, StoreError, StoreResult};
use notetable_core::table::{KeyAttribute, TableDefinition, TableStatus};

use super::conversions::{
    cursor_to_key, item_to_note, key_to_cursor, note_to_item, to_scalar_type, to_table_status,
};
use super::error::{
    map_create_table_error, map_describe_table_error, map_put_item_error, map_scan_error,
};

/// DynamoDB-backed note store.
pub struct DynamoDbStore {
    client: Client,
}

impl DynamoDbStore {
    /// Creates a new store with the given DynamoDB client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn build_error(err: impl std::fmt::Display) -> StoreError {
    StoreError::Other(format!("Invalid request: {}", err))
}

fn key_schema_element(key: &KeyAttribute, key_type: KeyType) -> StoreResult<KeySchemaElement> {
    KeySchemaElement::builder()
        .attribute_name(&key.name)
        .key_type(key_type)
        .build()
        .map_err(build_error)
}

fn attribute_definition(key: &KeyAttribute) -> StoreResult<AttributeDefinition> {
    AttributeDefinition::builder()
        .attribute_name(&key.name)
        .attribute_type(to_scalar_type(key.attribute_type))
        .build()
        .map_err(build_error)
}

#[async_trait]
impl NoteStore for DynamoDbStore {
    async fn create_table(&self, definition: &TableDefinition) -> StoreResult<TableStatus> {
        let key_schema = vec![
            key_schema_element(&definition.partition_key, KeyType::Hash)?,
            key_schema_element(&definition.sort_key, KeyType::Range)?,
        ];
        let attribute_definitions = vec![
            attribute_definition(&definition.partition_key)?,
            attribute_definition(&definition.sort_key)?,
        ];
        let throughput = ProvisionedThroughput::builder()
            .read_capacity_units(definition.throughput.read_capacity_units)
            .write_capacity_units(definition.throughput.write_capacity_units)
            .build()
            .map_err(build_error)?;

        tracing::debug!(table = %definition.name, "CreateTable");

        let output = self
            .client
            .create_table()
            .table_name(&definition.name)
            .set_key_schema(Some(key_schema))
            .set_attribute_definitions(Some(attribute_definitions))
            .provisioned_throughput(throughput)
            .send()
            .await
            .map_err(|e| map_create_table_error(e, &definition.name))?;

        Ok(output
            .table_description()
            .and_then(|table| table.table_status())
            .map(to_table_status)
            .unwrap_or(TableStatus::Creating))
    }

    async fn describe_table(&self, table_name: &str) -> StoreResult<TableStatus> {
        tracing::debug!(table = %table_name, "DescribeTable");

        let output = self
            .client
            .describe_table()
            .table_name(table_name)
            .send()
            .await
            .map_err(|e| map_describe_table_error(e, table_name))?;

        output
            .table()
            .and_then(|table| table.table_status())
            .map(to_table_status)
            .ok_or_else(|| {
                StoreError::InvalidData(format!("No status reported for table {}", table_name))
            })
    }

    async fn put_note(&self, table_name: &str, note: &Note) -> StoreResult<()> {
        tracing::debug!(
            table = %table_name,
            user_id = %note.user_id,
            note_id = note.note_id,
            "PutItem"
        );

        self.client
            .put_item()
            .table_name(table_name)
            .set_item(Some(note_to_item(note)))
            .send()
            .await
            .map_err(|e| map_put_item_error(e, table_name))?;

        Ok(())
    }

    async fn scan_page(
        &self,
        table_name: &str,
        limit: u32,
        start: Option<ScanCursor>,
    ) -> StoreResult<ScanOutput> {
        tracing::debug!(table = %table_name, limit, resumed = start.is_some(), "Scan");

        let limit = i32::try_from(limit).unwrap_or(i32::MAX);
        let output = self
            .client
            .scan()
            .table_name(table_name)
            .limit(limit)
            .set_exclusive_start_key(start.as_ref().map(cursor_to_key))
            .send()
            .await
            .map_err(|e| map_scan_error(e, table_name))?;

        let notes = output
            .items
            .unwrap_or_default()
            .iter()
            .map(item_to_note)
            .collect::<StoreResult<Vec<_>>>()?;
        let next = key_to_cursor(output.last_evaluated_key)?;

        Ok(ScanOutput { notes, next })
    }
}
