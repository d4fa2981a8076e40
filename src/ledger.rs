//! Batch ledger
//!
//! Wraps an engine run in the audited batch lifecycle: open a running
//! batch, execute the body, close with a terminal status. The ledger rows
//! live outside the data transaction, so a failed run stays queryable
//! together with its log lines.

use crate::db::models::{BatchStatus, Severity};
use crate::errors::Result;
use crate::store::Store;
use std::future::Future;
use tracing::{error, info};
use uuid::Uuid;

/// Run `body` inside a ledger batch.
///
/// The body receives the batch id to stamp on its writes and log lines.
/// On success the batch is closed as succeeded; on failure an error line
/// is appended best-effort, the batch is closed as failed, and the error
/// is returned to the caller.
pub async fn run_batch<S, F, Fut, T>(
    store: &S,
    module: &str,
    server: &str,
    body: F,
) -> Result<T>
where
    S: Store + ?Sized,
    F: FnOnce(Uuid) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let batch_id = store.start_batch(module, server).await?;
    info!(%batch_id, module, "batch started");

    match body(batch_id).await {
        Ok(value) => {
            store
                .append_log(batch_id, Severity::Info, "batch finished", None)
                .await?;
            store.finish_batch(batch_id, BatchStatus::Succeeded).await?;
            info!(%batch_id, module, "batch succeeded");
            Ok(value)
        }
        Err(err) => {
            error!(%batch_id, module, code = err.code().as_code(), %err, "batch failed");
            let line = format!("[{}] {err}", err.code().as_code());
            // Best-effort: the original error wins over ledger bookkeeping.
            let _ = store
                .append_log(batch_id, Severity::Error, &line, None)
                .await;
            let _ = store.finish_batch(batch_id, BatchStatus::Failed).await;
            Err(err)
        }
    }
}
