//! SQLite-backed repository for books and their category links.

use std::collections::{BTreeMap, BTreeSet};

use clubhouse_model::{Book, Entity, Id};
use sqlx::{SqliteConnection, SqlitePool};

use super::helpers::{found, owner_columns};
use crate::persistence::traits::{BookOwner, BookRepository, Repository};
use crate::persistence::PersistenceError;

/// Row type for book queries, mapped via `sqlx::FromRow`.
#[derive(sqlx::FromRow)]
struct BookRow {
    id: i64,
    title: String,
    author_id: i64,
    publisher_id: i64,
}

impl BookRow {
    fn into_entity(self, category_ids: BTreeSet<Id>) -> Entity<Book> {
        Entity::new(
            self.id,
            Book {
                title: self.title,
                author_id: self.author_id,
                publisher_id: self.publisher_id,
                category_ids,
            },
        )
    }
}

/// Row type for the `book_categories` join table.
#[derive(sqlx::FromRow)]
struct BookCategoryRow {
    book_id: i64,
    category_id: i64,
}

/// SQLite implementation of [`BookRepository`].
#[derive(Clone)]
pub struct SqliteBookRepository {
    pool: SqlitePool,
}

impl SqliteBookRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl Repository for SqliteBookRepository {
    type Record = Book;

    async fn find_all(&self) -> Result<Vec<Entity<Book>>, PersistenceError> {
        let rows: Vec<BookRow> = sqlx::query_as(
            "SELECT id, title, author_id, publisher_id FROM books ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        let links: Vec<BookCategoryRow> =
            sqlx::query_as("SELECT book_id, category_id FROM book_categories")
                .fetch_all(&self.pool)
                .await?;

        let mut by_book: BTreeMap<Id, BTreeSet<Id>> = BTreeMap::new();
        for link in links {
            by_book.entry(link.book_id).or_default().insert(link.category_id);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let categories = by_book.remove(&row.id).unwrap_or_default();
                row.into_entity(categories)
            })
            .collect())
    }

    async fn find_by_id(&self, id: Id) -> Result<Entity<Book>, PersistenceError> {
        let row: Option<BookRow> = sqlx::query_as(
            "SELECT id, title, author_id, publisher_id FROM books WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        let row = found::<Book, _>(row, id)?;

        let categories: Vec<i64> = sqlx::query_scalar(
            "SELECT category_id FROM book_categories WHERE book_id = ?",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(row.into_entity(categories.into_iter().collect()))
    }

    async fn create(&self, book: &Book) -> Result<Id, PersistenceError> {
        let mut tx = self.pool.begin().await?;

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO books (title, author_id, publisher_id) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(&book.title)
        .bind(book.author_id)
        .bind(book.publisher_id)
        .fetch_one(&mut *tx)
        .await?;

        insert_categories(&mut tx, id, &book.category_ids).await?;

        tx.commit().await?;
        Ok(id)
    }

    async fn update(&self, entity: &Entity<Book>) -> Result<u64, PersistenceError> {
        let book = &entity.data;
        let mut tx = self.pool.begin().await?;

        let affected = sqlx::query(
            "UPDATE books SET title = ?, author_id = ?, publisher_id = ? WHERE id = ?",
        )
        .bind(&book.title)
        .bind(book.author_id)
        .bind(book.publisher_id)
        .bind(entity.id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if affected == 0 {
            // Nothing to relink; dropping the transaction rolls it back.
            return Ok(0);
        }

        // Replace, never merge, the category links.
        sqlx::query("DELETE FROM book_categories WHERE book_id = ?")
            .bind(entity.id)
            .execute(&mut *tx)
            .await?;
        insert_categories(&mut tx, entity.id, &book.category_ids).await?;

        tx.commit().await?;
        Ok(affected)
    }

    async fn delete(&self, id: Id) -> Result<u64, PersistenceError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM book_categories WHERE book_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let affected = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        Ok(affected)
    }
}

impl BookRepository for SqliteBookRepository {
    async fn delete_owner_cascading(
        &self,
        owner: BookOwner,
        owner_id: Id,
    ) -> Result<u64, PersistenceError> {
        let (owner_table, owner_column) = owner_columns(owner);
        let mut tx = self.pool.begin().await?;

        let links = format!(
            "DELETE FROM book_categories WHERE book_id IN \
             (SELECT id FROM books WHERE {owner_column} = ?)"
        );
        sqlx::query(&links).bind(owner_id).execute(&mut *tx).await?;

        let books = format!("DELETE FROM books WHERE {owner_column} = ?");
        let removed_books = sqlx::query(&books)
            .bind(owner_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let owner_sql = format!("DELETE FROM {owner_table} WHERE id = ?");
        let affected = sqlx::query(&owner_sql)
            .bind(owner_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if affected == 0 {
            // Unknown owner: dropping the transaction rolls everything back.
            return Ok(0);
        }

        tx.commit().await?;
        tracing::debug!(?owner, owner_id, removed_books, "Deleted owner with its books");
        Ok(affected)
    }
}

/// Insert one `book_categories` row per category id.
async fn insert_categories(
    conn: &mut SqliteConnection,
    book_id: Id,
    category_ids: &BTreeSet<Id>,
) -> Result<(), PersistenceError> {
    for category_id in category_ids {
        sqlx::query("INSERT INTO book_categories (book_id, category_id) VALUES (?, ?)")
            .bind(book_id)
            .bind(category_id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}
