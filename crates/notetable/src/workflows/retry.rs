//! Bounded retries for remote calls.

use std::future::Future;

use notetable_core::storage::StoreResult;

use super::WorkflowContext;
use crate::error::{Result, WorkflowError};

/// Runs a remote call, retrying transient store failures with backoff.
///
/// Every attempt and every delay races the shutdown signal. Non-transient
/// failures, and the last transient one, are returned as they are.
pub async fn with_retry<T, F, Fut>(ctx: &WorkflowContext, operation: &str, mut call: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = StoreResult<T>>,
{
    let mut attempt = 0;
    loop {
        let pending = call();
        let result = ctx
            .shutdown
            .run(async { pending.await.map_err(WorkflowError::from) })
            .await;

        match result {
            Err(WorkflowError::Remote(err))
                if err.is_transient() && attempt + 1 < ctx.retry.max_attempts =>
            {
                let delay = ctx.retry.delay(attempt);
                attempt += 1;
                tracing::warn!(
                    operation,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Transient failure, retrying"
                );
                ctx.shutdown.sleep(delay).await?;
            }
            other => return other,
        }
    }
}
