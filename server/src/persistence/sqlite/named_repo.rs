//! SQLite-backed repository shared by every name-only record.

use std::marker::PhantomData;

use clubhouse_model::{Entity, Id};
use sqlx::SqlitePool;

use super::helpers::{found, NamedTable};
use crate::persistence::traits::Repository;
use crate::persistence::PersistenceError;

/// Row type for `(id, name)` tables, mapped via `sqlx::FromRow`.
#[derive(sqlx::FromRow)]
struct NamedRow {
    id: i64,
    name: String,
}

impl NamedRow {
    fn into_entity<T: NamedTable>(self) -> Entity<T> {
        Entity::new(self.id, T::from_name(self.name))
    }
}

/// SQLite implementation of [`Repository`] for authors, publishers,
/// categories, coaches and leagues.
pub struct SqliteNamedRepository<T> {
    pool: SqlitePool,
    _record: PhantomData<fn() -> T>,
}

impl<T> SqliteNamedRepository<T> {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            _record: PhantomData,
        }
    }
}

impl<T> Clone for SqliteNamedRepository<T> {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone())
    }
}

impl<T: NamedTable> Repository for SqliteNamedRepository<T> {
    type Record = T;

    async fn find_all(&self) -> Result<Vec<Entity<T>>, PersistenceError> {
        let sql = format!("SELECT id, name FROM {} ORDER BY id", T::TABLE);
        let rows: Vec<NamedRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(NamedRow::into_entity).collect())
    }

    async fn find_by_id(&self, id: Id) -> Result<Entity<T>, PersistenceError> {
        let sql = format!("SELECT id, name FROM {} WHERE id = ?", T::TABLE);
        let row: Option<NamedRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        found::<T, _>(row, id).map(NamedRow::into_entity)
    }

    async fn create(&self, record: &T) -> Result<Id, PersistenceError> {
        let sql = format!("INSERT INTO {} (name) VALUES (?) RETURNING id", T::TABLE);
        let id: i64 = sqlx::query_scalar(&sql)
            .bind(record.name())
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }

    async fn update(&self, entity: &Entity<T>) -> Result<u64, PersistenceError> {
        let sql = format!("UPDATE {} SET name = ? WHERE id = ?", T::TABLE);
        let result = sqlx::query(&sql)
            .bind(entity.data.name())
            .bind(entity.id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, id: Id) -> Result<u64, PersistenceError> {
        let sql = format!("DELETE FROM {} WHERE id = ?", T::TABLE);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
