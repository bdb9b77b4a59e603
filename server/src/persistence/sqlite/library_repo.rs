//! SQLite-backed repository for libraries and their ordered book ids.

use std::collections::BTreeMap;

use clubhouse_model::{Entity, Id, Library};
use sqlx::{SqliteConnection, SqlitePool};

use super::helpers::found;
use crate::persistence::traits::Repository;
use crate::persistence::PersistenceError;

#[derive(sqlx::FromRow)]
struct LibraryRow {
    id: i64,
    name: String,
}

#[derive(sqlx::FromRow)]
struct LibraryBookRow {
    library_id: i64,
    book_id: i64,
}

/// SQLite implementation of [`Repository`] for [`Library`].
///
/// Book ids live in `library_books`, keyed by position so the submitted
/// order (duplicates included) survives a round trip.
#[derive(Clone)]
pub struct SqliteLibraryRepository {
    pool: SqlitePool,
}

impl SqliteLibraryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl Repository for SqliteLibraryRepository {
    type Record = Library;

    async fn find_all(&self) -> Result<Vec<Entity<Library>>, PersistenceError> {
        let rows: Vec<LibraryRow> = sqlx::query_as("SELECT id, name FROM libraries ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        let links: Vec<LibraryBookRow> = sqlx::query_as(
            "SELECT library_id, book_id FROM library_books ORDER BY library_id, position",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut by_library: BTreeMap<Id, Vec<Id>> = BTreeMap::new();
        for link in links {
            by_library.entry(link.library_id).or_default().push(link.book_id);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let book_ids = by_library.remove(&row.id).unwrap_or_default();
                Entity::new(
                    row.id,
                    Library {
                        name: row.name,
                        book_ids,
                    },
                )
            })
            .collect())
    }

    async fn find_by_id(&self, id: Id) -> Result<Entity<Library>, PersistenceError> {
        let row: Option<LibraryRow> = sqlx::query_as("SELECT id, name FROM libraries WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        let row = found::<Library, _>(row, id)?;

        let book_ids: Vec<i64> = sqlx::query_scalar(
            "SELECT book_id FROM library_books WHERE library_id = ? ORDER BY position",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Entity::new(
            row.id,
            Library {
                name: row.name,
                book_ids,
            },
        ))
    }

    async fn create(&self, library: &Library) -> Result<Id, PersistenceError> {
        let mut tx = self.pool.begin().await?;

        let id: i64 = sqlx::query_scalar("INSERT INTO libraries (name) VALUES (?) RETURNING id")
            .bind(&library.name)
            .fetch_one(&mut *tx)
            .await?;
        insert_books(&mut tx, id, &library.book_ids).await?;

        tx.commit().await?;
        Ok(id)
    }

    async fn update(&self, entity: &Entity<Library>) -> Result<u64, PersistenceError> {
        let mut tx = self.pool.begin().await?;

        let affected = sqlx::query("UPDATE libraries SET name = ? WHERE id = ?")
            .bind(&entity.data.name)
            .bind(entity.id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if affected == 0 {
            return Ok(0);
        }

        sqlx::query("DELETE FROM library_books WHERE library_id = ?")
            .bind(entity.id)
            .execute(&mut *tx)
            .await?;
        insert_books(&mut tx, entity.id, &entity.data.book_ids).await?;

        tx.commit().await?;
        Ok(affected)
    }

    async fn delete(&self, id: Id) -> Result<u64, PersistenceError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM library_books WHERE library_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let affected = sqlx::query("DELETE FROM libraries WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        Ok(affected)
    }
}

async fn insert_books(
    conn: &mut SqliteConnection,
    library_id: Id,
    book_ids: &[Id],
) -> Result<(), PersistenceError> {
    for (position, book_id) in book_ids.iter().enumerate() {
        sqlx::query("INSERT INTO library_books (library_id, position, book_id) VALUES (?, ?, ?)")
            .bind(library_id)
            .bind(position as i64)
            .bind(book_id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}
