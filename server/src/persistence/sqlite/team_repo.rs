//! SQLite-backed repository for teams.

use clubhouse_model::{Entity, Id, Team};
use sqlx::SqlitePool;

use super::helpers::found;
use crate::persistence::traits::Repository;
use crate::persistence::PersistenceError;

#[derive(sqlx::FromRow)]
struct TeamRow {
    id: i64,
    name: String,
    coach_id: i64,
    league_id: i64,
}

impl From<TeamRow> for Entity<Team> {
    fn from(row: TeamRow) -> Self {
        Entity::new(
            row.id,
            Team {
                name: row.name,
                coach_id: row.coach_id,
                league_id: row.league_id,
            },
        )
    }
}

/// SQLite implementation of [`Repository`] for [`Team`].
#[derive(Clone)]
pub struct SqliteTeamRepository {
    pool: SqlitePool,
}

impl SqliteTeamRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl Repository for SqliteTeamRepository {
    type Record = Team;

    async fn find_all(&self) -> Result<Vec<Entity<Team>>, PersistenceError> {
        let rows: Vec<TeamRow> =
            sqlx::query_as("SELECT id, name, coach_id, league_id FROM teams ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(Entity::from).collect())
    }

    async fn find_by_id(&self, id: Id) -> Result<Entity<Team>, PersistenceError> {
        let row: Option<TeamRow> =
            sqlx::query_as("SELECT id, name, coach_id, league_id FROM teams WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        found::<Team, _>(row, id).map(Entity::from)
    }

    async fn create(&self, team: &Team) -> Result<Id, PersistenceError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO teams (name, coach_id, league_id) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(&team.name)
        .bind(team.coach_id)
        .bind(team.league_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn update(&self, entity: &Entity<Team>) -> Result<u64, PersistenceError> {
        let result =
            sqlx::query("UPDATE teams SET name = ?, coach_id = ?, league_id = ? WHERE id = ?")
                .bind(&entity.data.name)
                .bind(entity.data.coach_id)
                .bind(entity.data.league_id)
                .bind(entity.id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, id: Id) -> Result<u64, PersistenceError> {
        let result = sqlx::query("DELETE FROM teams WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
