//! SQLite-backed repository for matches.

use chrono::NaiveDateTime;
use clubhouse_model::{Entity, Id, Match};
use sqlx::SqlitePool;

use super::helpers::found;
use crate::persistence::traits::Repository;
use crate::persistence::PersistenceError;

#[derive(sqlx::FromRow)]
struct MatchRow {
    id: i64,
    home_team_id: i64,
    away_team_id: i64,
    match_date: NaiveDateTime,
    home_score: i32,
    away_score: i32,
}

impl From<MatchRow> for Entity<Match> {
    fn from(row: MatchRow) -> Self {
        Entity::new(
            row.id,
            Match {
                home_team_id: row.home_team_id,
                away_team_id: row.away_team_id,
                match_date: row.match_date,
                home_score: row.home_score,
                away_score: row.away_score,
            },
        )
    }
}

const SELECT_COLUMNS: &str =
    "SELECT id, home_team_id, away_team_id, match_date, home_score, away_score FROM matches";

/// SQLite implementation of [`Repository`] for [`Match`].
#[derive(Clone)]
pub struct SqliteMatchRepository {
    pool: SqlitePool,
}

impl SqliteMatchRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl Repository for SqliteMatchRepository {
    type Record = Match;

    async fn find_all(&self) -> Result<Vec<Entity<Match>>, PersistenceError> {
        let sql = format!("{SELECT_COLUMNS} ORDER BY id");
        let rows: Vec<MatchRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Entity::from).collect())
    }

    async fn find_by_id(&self, id: Id) -> Result<Entity<Match>, PersistenceError> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = ?");
        let row: Option<MatchRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        found::<Match, _>(row, id).map(Entity::from)
    }

    async fn create(&self, m: &Match) -> Result<Id, PersistenceError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO matches (home_team_id, away_team_id, match_date, home_score, away_score) \
             VALUES (?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(m.home_team_id)
        .bind(m.away_team_id)
        .bind(m.match_date)
        .bind(m.home_score)
        .bind(m.away_score)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn update(&self, entity: &Entity<Match>) -> Result<u64, PersistenceError> {
        let m = &entity.data;
        let result = sqlx::query(
            "UPDATE matches SET home_team_id = ?, away_team_id = ?, match_date = ?, \
             home_score = ?, away_score = ? WHERE id = ?",
        )
        .bind(m.home_team_id)
        .bind(m.away_team_id)
        .bind(m.match_date)
        .bind(m.home_score)
        .bind(m.away_score)
        .bind(entity.id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, id: Id) -> Result<u64, PersistenceError> {
        let result = sqlx::query("DELETE FROM matches WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
