use std::error::Error;
use std::time::Duration;

/// Errors reported by a [`RowStore`](super::RowStore).
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The database rejected the statement or the connection failed.
    #[error("{}", describe_pg_error(.0))]
    Postgres(#[from] tokio_postgres::Error),

    /// The insert did not complete within the configured bound.
    #[error("insert timed out after {0:?}")]
    Timeout(Duration),
}

/// Renders a postgres error with the server's message when there is one,
/// otherwise with its full cause chain.
///
/// `tokio_postgres::Error`'s own `Display` only names the error kind
/// ("db error", "error connecting to server"); the cause lives in `source()`.
fn describe_pg_error(err: &tokio_postgres::Error) -> String {
    match err.as_db_error() {
        Some(db) => {
            let mut text = format!("{}: {}", db.severity(), db.message());
            if let Some(detail) = db.detail() {
                text.push_str(&format!(" ({detail})"));
            }
            text
        }
        None => describe_chain(err),
    }
}

/// `err: cause: cause ...`, following `source()` to the root.
fn describe_chain(err: &dyn Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
