//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Categorized by constraint kind                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Caller (no retry, no recovery)                                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use sales_core::CoreError;
use sqlx::error::{DatabaseError, ErrorKind};
use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - Updating or deleting an id that doesn't exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Sale referencing a non-existent branch_id
    /// - Detail referencing a non-existent sale_id or product_id
    /// - Deleting a product still referenced under the RESTRICT policy
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// NOT NULL, CHECK or UNIQUE constraint violation.
    #[error("Constraint violation: {message}")]
    ConstraintViolation { message: String },

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - Database file can't be created
    /// - File permissions issue
    #[error("Connection failed: {0}")]
    ConnectionFailed(#[source] sqlx::Error),

    /// Query execution failed. Carries the driver error unchanged.
    #[error("Query failed: {0}")]
    QueryFailed(#[source] sqlx::Error),

    /// The schema registry is inconsistent.
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// Bootstrap did not finish within the caller's limit.
    #[error("Schema creation timed out after {0:?}")]
    Timeout(Duration),

    /// A stored value could not be decoded into its domain type.
    #[error("Invalid data: {0}")]
    InvalidData(#[from] CoreError),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// True for foreign key violations.
    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(self, DbError::ForeignKeyViolation { .. })
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database (FK)     → DbError::ForeignKeyViolation
/// sqlx::Error::Database (other)  → DbError::ConstraintViolation / QueryFailed
/// sqlx::Error::PoolTimedOut      → DbError::PoolExhausted
/// sqlx::Error::PoolClosed        → DbError::ConnectionFailed
/// Other                          → DbError::Internal
/// ```
///
/// Stored prices are range-checked by the repository after decoding, so an
/// out-of-range value arrives as `DbError::InvalidData` through
/// `From<CoreError>`, not through this conversion.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),

            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();
                if is_foreign_key_error(&*db_err) {
                    return DbError::ForeignKeyViolation { message };
                }
                match db_err.kind() {
                    ErrorKind::NotNullViolation
                    | ErrorKind::CheckViolation
                    | ErrorKind::UniqueViolation => DbError::ConstraintViolation { message },
                    _ => DbError::QueryFailed(sqlx::Error::Database(db_err)),
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed(err),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

/// SQLite reports foreign key failures under two extended codes:
/// SQLITE_CONSTRAINT_FOREIGNKEY (787) for a missing parent, and
/// SQLITE_CONSTRAINT_TRIGGER (1811) for an `ON DELETE RESTRICT` parent delete.
/// sqlx only maps the first to `ErrorKind::ForeignKeyViolation`.
fn is_foreign_key_error(db_err: &dyn DatabaseError) -> bool {
    matches!(db_err.kind(), ErrorKind::ForeignKeyViolation)
        || db_err.code().as_deref() == Some("1811")
        || db_err.message().contains("FOREIGN KEY constraint failed")
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DbError::not_found("Branch", 42);
        assert_eq!(err.to_string(), "Branch not found: 42");

        let err = DbError::Timeout(Duration::from_secs(5));
        assert_eq!(err.to_string(), "Schema creation timed out after 5s");
    }

    #[test]
    fn test_pool_errors() {
        assert!(matches!(
            DbError::from(sqlx::Error::PoolTimedOut),
            DbError::PoolExhausted
        ));
        assert!(matches!(
            DbError::from(sqlx::Error::PoolClosed),
            DbError::ConnectionFailed(_)
        ));
    }

    #[test]
    fn test_driver_error_kept_as_source() {
        use std::error::Error as _;

        let err = DbError::from(sqlx::Error::PoolClosed);
        let source = err.source().expect("driver error is the source");
        assert!(source.downcast_ref::<sqlx::Error>().is_some());
    }
}
