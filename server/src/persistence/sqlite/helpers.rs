//! Shared helpers for SQLite ↔ domain type conversions.
//!
//! Table names only ever come from the constants in this module; values
//! supplied by callers are always bound as parameters.

use clubhouse_model::{Author, Category, Coach, Id, League, NamedRecord, Publisher, Record};

use crate::persistence::traits::BookOwner;
use crate::persistence::PersistenceError;

// ── Named tables ───────────────────────────────────────────────────────

/// A name-only record stored in a table with columns `(id, name)`.
pub trait NamedTable: NamedRecord {
    const TABLE: &'static str;
}

impl NamedTable for Author {
    const TABLE: &'static str = "authors";
}

impl NamedTable for Publisher {
    const TABLE: &'static str = "publishers";
}

impl NamedTable for Category {
    const TABLE: &'static str = "categories";
}

impl NamedTable for Coach {
    const TABLE: &'static str = "coaches";
}

impl NamedTable for League {
    const TABLE: &'static str = "leagues";
}

// ── Book owners ────────────────────────────────────────────────────────

/// `(owner table, foreign-key column on books)` for a book owner.
pub fn owner_columns(owner: BookOwner) -> (&'static str, &'static str) {
    match owner {
        BookOwner::Author => (Author::TABLE, "author_id"),
        BookOwner::Publisher => (Publisher::TABLE, "publisher_id"),
    }
}

// ── Lookups ────────────────────────────────────────────────────────────

/// Turn an optional row into the record, or `RowNotFound` naming `R`.
pub fn found<R: Record, T>(row: Option<T>, id: Id) -> Result<T, PersistenceError> {
    row.ok_or(PersistenceError::RowNotFound { kind: R::KIND, id })
}
