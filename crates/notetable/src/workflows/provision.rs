//! Table provisioning: create the table, then wait for it to become active.

use std::io::Write;

use notetable_core::retry::WaitPolicy;
use notetable_core::storage::{NoteStore, StoreError};
use notetable_core::table::{readiness, Readiness, TableDefinition, TableStatus};
use tokio::time::Instant;

use super::retry::with_retry;
use super::WorkflowContext;
use crate::error::{Result, WorkflowError};

/// Issues a single creation request for `definition`.
///
/// A request the store refuses (name collision, invalid schema) becomes
/// [`WorkflowError::Provisioning`].
pub async fn create_table(
    store: &dyn NoteStore,
    ctx: &WorkflowContext,
    definition: &TableDefinition,
    out: &mut impl Write,
) -> Result<TableStatus> {
    writeln!(
        out,
        "Creating table \"{}\" with partition key {} and sort key {}",
        definition.name, definition.partition_key.name, definition.sort_key.name
    )?;

    let status = with_retry(ctx, "CreateTable", || store.create_table(definition))
        .await
        .map_err(|err| match err {
            WorkflowError::Remote(StoreError::Rejected(reason)) => WorkflowError::Provisioning {
                table_name: definition.name.clone(),
                reason,
            },
            other => other,
        })?;

    tracing::info!(table = %definition.name, %status, "Table creation requested");
    writeln!(out, "Table Status: {}", status)?;

    Ok(status)
}

/// Polls the table status until it is ACTIVE.
///
/// Delays grow exponentially; the loop gives up with
/// [`WorkflowError::ProvisioningTimeout`] once the attempt cap or the total
/// wait is reached, including time spent inside a slow status call. A status the table will not leave on its own fails with
/// [`WorkflowError::Provisioning`].
pub async fn wait_until_active(
    store: &dyn NoteStore,
    ctx: &WorkflowContext,
    table_name: &str,
    policy: &WaitPolicy,
    out: &mut impl Write,
) -> Result<TableStatus> {
    writeln!(out, "Waiting for the table to be available...")?;

    let started = Instant::now();
    let mut attempts = 0;

    while attempts < policy.backoff.max_attempts {
        attempts += 1;

        // The call itself, retries included, counts against the total wait.
        let remaining = policy.max_wait.saturating_sub(started.elapsed());
        let polled = tokio::time::timeout(
            remaining,
            with_retry(ctx, "DescribeTable", || store.describe_table(table_name)),
        )
        .await;

        let status = match polled {
            Err(_) => {
                tracing::warn!(table = %table_name, attempts, "DescribeTable outlasted the wait");
                break;
            }
            Ok(Ok(status)) => status,
            // A fresh table may not be visible to DescribeTable yet.
            Ok(Err(WorkflowError::Remote(StoreError::NotFound(_)))) => TableStatus::Creating,
            Ok(Err(err)) => return Err(err),
        };

        tracing::debug!(table = %table_name, %status, attempts, "Polled table status");

        match readiness(&status) {
            Readiness::Ready => {
                writeln!(out, "Table is now available.")?;
                writeln!(out, "Table Status: {}", status)?;
                return Ok(status);
            }
            Readiness::Failed => {
                return Err(WorkflowError::Provisioning {
                    table_name: table_name.to_string(),
                    reason: format!("table entered status {}", status),
                });
            }
            Readiness::Pending => {}
        }

        let delay = policy.backoff.delay(attempts - 1);
        if attempts >= policy.backoff.max_attempts || policy.exceeds(started.elapsed(), delay) {
            break;
        }
        ctx.shutdown.sleep(delay).await?;
    }

    Err(WorkflowError::ProvisioningTimeout {
        table_name: table_name.to_string(),
        attempts,
        waited: started.elapsed(),
    })
}
