//! SQLite-backed repository for players.

use clubhouse_model::{Entity, Id, Player};
use sqlx::SqlitePool;

use super::helpers::found;
use crate::persistence::traits::Repository;
use crate::persistence::PersistenceError;

#[derive(sqlx::FromRow)]
struct PlayerRow {
    id: i64,
    name: String,
    team_id: i64,
}

impl From<PlayerRow> for Entity<Player> {
    fn from(row: PlayerRow) -> Self {
        Entity::new(
            row.id,
            Player {
                name: row.name,
                team_id: row.team_id,
            },
        )
    }
}

/// SQLite implementation of [`Repository`] for [`Player`].
#[derive(Clone)]
pub struct SqlitePlayerRepository {
    pool: SqlitePool,
}

impl SqlitePlayerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl Repository for SqlitePlayerRepository {
    type Record = Player;

    async fn find_all(&self) -> Result<Vec<Entity<Player>>, PersistenceError> {
        let rows: Vec<PlayerRow> = sqlx::query_as("SELECT id, name, team_id FROM players ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Entity::from).collect())
    }

    async fn find_by_id(&self, id: Id) -> Result<Entity<Player>, PersistenceError> {
        let row: Option<PlayerRow> =
            sqlx::query_as("SELECT id, name, team_id FROM players WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        found::<Player, _>(row, id).map(Entity::from)
    }

    async fn create(&self, player: &Player) -> Result<Id, PersistenceError> {
        let id: i64 =
            sqlx::query_scalar("INSERT INTO players (name, team_id) VALUES (?, ?) RETURNING id")
                .bind(&player.name)
                .bind(player.team_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(id)
    }

    async fn update(&self, entity: &Entity<Player>) -> Result<u64, PersistenceError> {
        let result = sqlx::query("UPDATE players SET name = ?, team_id = ? WHERE id = ?")
            .bind(&entity.data.name)
            .bind(entity.data.team_id)
            .bind(entity.id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, id: Id) -> Result<u64, PersistenceError> {
        let result = sqlx::query("DELETE FROM players WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::sqlite::integration_tests::seed_team;
    use crate::persistence::sqlite::Database;

    #[tokio::test]
    async fn test_create_find_update_delete() {
        let db = Database::new_in_memory().await.unwrap();
        let team = seed_team(&db, "Rovers").await;
        let repo = SqlitePlayerRepository::new(db.pool().clone());

        let id = repo
            .create(&Player {
                name: "Jamie".into(),
                team_id: team,
            })
            .await
            .unwrap();
        assert_eq!(repo.find_by_id(id).await.unwrap().data.team_id, team);

        let moved = Player {
            name: "Jamie V".into(),
            team_id: team,
        };
        assert_eq!(repo.update(&Entity::new(id, moved.clone())).await.unwrap(), 1);
        assert_eq!(repo.find_by_id(id).await.unwrap(), Entity::new(id, moved));

        assert_eq!(repo.delete(id).await.unwrap(), 1);
        assert!(matches!(
            repo.find_by_id(id).await,
            Err(PersistenceError::RowNotFound { kind: "Player", .. })
        ));
    }

    #[tokio::test]
    async fn test_unknown_team_rejected_by_store() {
        let db = Database::new_in_memory().await.unwrap();
        let repo = SqlitePlayerRepository::new(db.pool().clone());
        let result = repo
            .create(&Player {
                name: "Ghost".into(),
                team_id: 999,
            })
            .await;
        assert!(matches!(result, Err(PersistenceError::ConstraintViolation(_))));
    }
}
