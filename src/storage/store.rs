use std::time::Duration;

use futures::future::BoxFuture;

use super::error::StorageError;
use crate::model::Submission;

/// A backend that persists one submission per call.
///
/// Errors are passed through to the form as-is; the caller does not
/// classify them.
pub trait RowStore: Send + Sync {
    /// Inserts the row. The returned future owns everything it needs so it
    /// can run as a detached task.
    fn insert(&self, submission: Submission) -> BoxFuture<'static, Result<(), StorageError>>;
}

/// Runs [`RowStore::insert`], failing with [`StorageError::Timeout`] if it
/// does not finish within `timeout`.
pub async fn insert_with_timeout(
    store: &dyn RowStore,
    submission: Submission,
    timeout: Option<Duration>,
) -> Result<(), StorageError> {
    let insert = store.insert(submission);
    match timeout {
        Some(limit) => tokio::time::timeout(limit, insert)
            .await
            .map_err(|_| StorageError::Timeout(limit))?,
        None => insert.await,
    }
}
