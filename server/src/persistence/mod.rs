//! Persistence layer: repository contracts and their SQLite implementations.

pub mod sqlite;
pub mod traits;

pub use traits::{BookOwner, BookRepository, Repository};

use clubhouse_model::Id;

/// Errors from the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// A lookup by identifier matched zero rows.
    #[error("no {kind} row with id {id}")]
    RowNotFound { kind: &'static str, id: Id },
    /// The store rejected a write that would break a foreign-key reference.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
    #[error("database error: {0}")]
    Database(sqlx::Error),
    #[error("migration error: {0}")]
    Migration(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<sqlx::Error> for PersistenceError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                PersistenceError::ConstraintViolation(db.message().to_string())
            }
            _ => PersistenceError::Database(e),
        }
    }
}
