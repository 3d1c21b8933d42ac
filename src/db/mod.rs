mod farmer_repo;

pub use farmer_repo::FarmerRepository;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Errors from the record store. Connection-level failures are kept apart
/// from individual statement failures so callers can tell "store unreachable"
/// from "this operation was rejected".
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to reach record store: {0}")]
    Connection(#[source] sqlx::Error),
    #[error("failed to prepare record store: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("failed to create database directory '{0}': {1}")]
    CreateDir(PathBuf, #[source] std::io::Error),
    #[error("{op} on {table} failed: {source}")]
    Operation {
        table: &'static str,
        op: &'static str,
        #[source]
        source: sqlx::Error,
    },
    #[error("farmer {0} not found")]
    FarmerNotFound(i64),
}

impl StoreError {
    /// Tag a statement failure with the table and operation it came from.
    pub(crate) fn op(
        table: &'static str,
        op: &'static str,
    ) -> impl FnOnce(sqlx::Error) -> StoreError {
        move |source| StoreError::Operation { table, op, source }
    }
}

/// Initialize the database connection pool and run migrations.
pub async fn init_db(db_path: &Path) -> Result<SqlitePool, StoreError> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| StoreError::CreateDir(parent.to_path_buf(), e))?;
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)
        .map_err(StoreError::Connection)?
        .foreign_keys(true)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(StoreError::Connection)?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_init_db_creates_tables() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let pool = init_db(&db_path).await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' AND name NOT LIKE '_sqlx_%' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        let table_names: Vec<&str> = tables.iter().map(|t| t.0.as_str()).collect();
        assert!(table_names.contains(&"farmers"));
        assert!(table_names.contains(&"nursery"));
        assert!(table_names.contains(&"spraying"));
        assert!(table_names.contains(&"harvesting"));
        assert!(table_names.contains(&"receiving"));
    }
}
