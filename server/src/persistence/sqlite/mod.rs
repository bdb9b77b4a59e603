//! SQLite-backed repository implementations.
//!
//! ## Database setup
//!
//! [`Database`] wraps a `sqlx::SqlitePool` configured with:
//! - **WAL mode**: one writer and multiple concurrent readers.
//! - **Foreign keys enabled**: enforced at the connection level. A delete
//!   that would orphan a dependent row fails with
//!   [`PersistenceError::ConstraintViolation`](crate::persistence::PersistenceError).
//! - **Embedded migrations**: `sqlx::migrate!` runs `migrations/001_initial_schema.sql`
//!   when [`Database::open`] is called. The schema is idempotent.
//!
//! ## Repository types
//!
//! Each `Sqlite*Repository` holds a cloned `SqlitePool` and implements
//! [`Repository`](crate::persistence::Repository) for one record type:
//!
//! | Type | Record |
//! |------|--------|
//! | [`SqliteNamedRepository<T>`] | `Author`, `Publisher`, `Category`, `Coach`, `League` |
//! | [`SqliteBookRepository`] | `Book` (also `BookRepository`) |
//! | [`SqliteLibraryRepository`] | `Library` |
//! | [`SqliteTeamRepository`] | `Team` |
//! | [`SqlitePlayerRepository`] | `Player` |
//! | [`SqliteMatchRepository`] | `Match` |
//!
//! Association collections (book categories, library books) live in join
//! tables and are rewritten inside the same transaction as their parent row.

mod book_repo;
mod database;
mod library_repo;
mod match_repo;
mod named_repo;
mod player_repo;
mod team_repo;
#[cfg(test)]
pub(crate) mod integration_tests;
pub(crate) mod helpers;

pub use book_repo::SqliteBookRepository;
pub use database::Database;
pub use library_repo::SqliteLibraryRepository;
pub use match_repo::SqliteMatchRepository;
pub use named_repo::SqliteNamedRepository;
pub use player_repo::SqlitePlayerRepository;
pub use team_repo::SqliteTeamRepository;
