//! # Bootstrap
//!
//! One-shot schema creation: connect, create tables, disconnect.
//!
//! ```text
//! bootstrap(config, &registry, timeout)
//!      │
//!      ├── Database::new(config)          connect (bounded by connect_timeout)
//!      └── bootstrap_with(&db, ...)
//!           ├── initialize_schema(&registry)   bounded by `timeout`, if any
//!           ├── close()                        always, whatever the outcome
//!           └── return the schema result
//! ```

use std::time::Duration;

use tracing::{info, warn};

use crate::error::{DbError, DbResult};
use crate::pool::{Database, DbConfig};
use crate::schema::SchemaRegistry;

/// Materializes `registry` in the database described by `config`, then
/// releases every connection.
///
/// The pool is closed on success, on failure and on timeout. Errors from
/// the driver are returned unchanged; no retry is attempted.
///
/// ## Example
/// ```rust,ignore
/// bootstrap(DbConfig::in_memory(), &SchemaRegistry::default(), None).await?;
/// ```
pub async fn bootstrap(
    config: DbConfig,
    registry: &SchemaRegistry,
    timeout: Option<Duration>,
) -> DbResult<()> {
    let db = Database::new(config).await?;
    bootstrap_with(&db, registry, timeout).await
}

/// Same as [`bootstrap`] over an already connected database.
///
/// `db` is closed before this returns, whatever the outcome.
pub async fn bootstrap_with(
    db: &Database,
    registry: &SchemaRegistry,
    timeout: Option<Duration>,
) -> DbResult<()> {
    let result = run_with_timeout(db, registry, timeout).await;

    db.close().await;

    match &result {
        Ok(()) => info!(tables = ?registry.table_names(), "Bootstrap complete"),
        Err(e) => warn!(error = %e, "Bootstrap failed"),
    }
    result
}

async fn run_with_timeout(
    db: &Database,
    registry: &SchemaRegistry,
    timeout: Option<Duration>,
) -> DbResult<()> {
    match timeout {
        Some(limit) => tokio::time::timeout(limit, db.initialize_schema(registry))
            .await
            .map_err(|_| DbError::Timeout(limit))?,
        None => db.initialize_schema(registry).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnType, TableDef};

    #[tokio::test]
    async fn test_bootstrap_in_memory() {
        bootstrap(DbConfig::in_memory(), &SchemaRegistry::default(), None)
            .await
            .unwrap();
    }

    fn reserved_word_registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::empty();
        // "order" is a reserved word; the generated DDL is rejected by SQLite
        registry
            .register(TableDef::new("order").column("note", ColumnType::Real))
            .unwrap();
        registry
    }

    #[tokio::test]
    async fn test_bootstrap_with_closes_pool_on_success() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        bootstrap_with(&db, &SchemaRegistry::default(), None)
            .await
            .unwrap();

        assert!(db.is_closed());
    }

    #[tokio::test]
    async fn test_bootstrap_with_closes_pool_on_failure() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err = bootstrap_with(&db, &reserved_word_registry(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::QueryFailed(_)), "unexpected error: {err}");
        assert!(db.is_closed());
    }

    #[tokio::test]
    async fn test_bootstrap_timeout() {
        let err = bootstrap(
            DbConfig::in_memory(),
            &SchemaRegistry::default(),
            Some(Duration::ZERO),
        )
        .await
        .unwrap_err();

        assert!(
            matches!(err, DbError::Timeout(limit) if limit.is_zero()),
            "unexpected error: {err}"
        );
    }

    #[tokio::test]
    async fn test_bootstrap_with_closes_pool_on_timeout() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err = bootstrap_with(&db, &SchemaRegistry::default(), Some(Duration::ZERO))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::Timeout(_)), "unexpected error: {err}");
        assert!(db.is_closed());
    }

    #[tokio::test]
    async fn test_bootstrap_with_generous_timeout() {
        bootstrap(
            DbConfig::in_memory(),
            &SchemaRegistry::default(),
            Some(Duration::from_secs(30)),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_bootstrap_connection_failure_propagates() {
        let config = DbConfig::new("/nonexistent-directory/for/sales.db")
            .connect_timeout(Duration::from_secs(1));

        let err = bootstrap(config, &SchemaRegistry::default(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::ConnectionFailed(_)), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn test_bootstrap_ddl_failure_propagates() {
        let err = bootstrap(DbConfig::in_memory(), &reserved_word_registry(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::QueryFailed(_)), "unexpected error: {err}");
    }
}
