use std::sync::Arc;

use futures::future::BoxFuture;
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, NoTls};

use super::error::StorageError;
use super::store::RowStore;
use crate::config::DatabaseConfig;
use crate::model::{FieldId, Submission};

/// [`RowStore`] backed by a single PostgreSQL connection.
pub struct PgRowStore {
    client: Arc<Client>,
    statement: String,
}

impl PgRowStore {
    /// Opens the connection and spawns its driver task on the current tokio
    /// runtime.
    ///
    /// `config.table` must already be a validated identifier; it is
    /// interpolated into the insert statement.
    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StorageError> {
        let (client, connection) = tokio_postgres::connect(&config.connection_string(), NoTls).await?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                log::error!("database connection closed: {e}");
            }
        });

        log::info!("connected to {}", config.target());
        Ok(Self {
            client: Arc::new(client),
            statement: insert_statement(&config.table),
        })
    }
}

impl RowStore for PgRowStore {
    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    fn insert(&self, submission: Submission) -> BoxFuture<'static, Result<(), StorageError>> {
        let client = Arc::clone(&self.client);
        let statement = self.statement.clone();
        Box::pin(async move {
            let values = FieldId::ALL.map(|field| submission.value(field));
            let params: Vec<&(dyn ToSql + Sync)> =
                values.iter().map(|v| v as &(dyn ToSql + Sync)).collect();
            let rows = client.execute(statement.as_str(), &params).await?;
            log::debug!("insert affected {rows} row(s)");
            Ok(())
        })
    }
}

/// Positional insert of the four form values, in [`FieldId::ALL`] order.
fn insert_statement(table: &str) -> String {
    format!("INSERT INTO {table} VALUES ($1, $2, $3, $4)")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statement_uses_four_positional_params() {
        assert_eq!(
            insert_statement("usergroup"),
            "INSERT INTO usergroup VALUES ($1, $2, $3, $4)"
        );
    }
}
