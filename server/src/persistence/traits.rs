//! Async repository contracts for the persistence layer.
//!
//! One contract per entity, expressed as a single generic [`Repository`]
//! trait whose associated `Record` type names the entity. Services are
//! generic over these traits, so any backend can sit underneath them.
//!
//! Methods return `impl Future + Send` rather than using `async fn` so that
//! the futures are guaranteed `Send`, which `tokio::spawn` requires for the
//! per-connection tasks of the HTTP server.

use std::future::Future;

use clubhouse_model::{Book, Entity, Id, Record};

use super::PersistenceError;

/// Repository for one entity type.
///
/// Implementations must:
/// - bind every caller-supplied value as a statement parameter
/// - return the generated key from the same round trip as the insert
/// - map rows by column name
pub trait Repository: Send + Sync {
    type Record: Record;

    /// Every stored record, ordered by identifier. Empty when no rows exist.
    fn find_all(
        &self,
    ) -> impl Future<Output = Result<Vec<Entity<Self::Record>>, PersistenceError>> + Send;

    /// The record with `id`, or [`PersistenceError::RowNotFound`].
    fn find_by_id(
        &self,
        id: Id,
    ) -> impl Future<Output = Result<Entity<Self::Record>, PersistenceError>> + Send;

    /// Insert a new row and return the identifier the store assigned.
    fn create(
        &self,
        record: &Self::Record,
    ) -> impl Future<Output = Result<Id, PersistenceError>> + Send;

    /// Overwrite every column of the row with `entity.id`. Returns the
    /// number of rows affected; zero means no such row.
    fn update(
        &self,
        entity: &Entity<Self::Record>,
    ) -> impl Future<Output = Result<u64, PersistenceError>> + Send;

    /// Remove the row with `id`. Returns the number of rows affected; zero
    /// means no such row.
    fn delete(&self, id: Id) -> impl Future<Output = Result<u64, PersistenceError>> + Send;
}

/// The records that own books: deleting one of them removes its books.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookOwner {
    Author,
    Publisher,
}

/// Book repository with the owner cascade.
///
/// Implementations must delete, in this order and atomically: the category
/// links of every book the owner owns, those books, then the owner row.
pub trait BookRepository: Repository<Record = Book> {
    /// Returns the number of owner rows removed (zero when the owner does
    /// not exist, in which case nothing is deleted).
    fn delete_owner_cascading(
        &self,
        owner: BookOwner,
        owner_id: Id,
    ) -> impl Future<Output = Result<u64, PersistenceError>> + Send;
}
