//! Player service.

use clubhouse_model::{Entity, Id, Player, PlayerDto, PlayerInput, Record, Team, Validate};

use super::{affected, deleted, ensure_exists, CrudService, ServiceError};
use crate::persistence::Repository;

#[derive(Clone)]
pub struct PlayerService<P, T> {
    players: P,
    teams: T,
}

impl<P, T> PlayerService<P, T> {
    pub fn new(players: P, teams: T) -> Self {
        Self { players, teams }
    }
}

impl<P, T> CrudService for PlayerService<P, T>
where
    P: Repository<Record = Player>,
    T: Repository<Record = Team>,
{
    type Input = PlayerInput;
    type Output = PlayerDto;

    async fn find_all(&self) -> Result<Vec<PlayerDto>, ServiceError> {
        let all = self.players.find_all().await?;
        Ok(all.iter().map(PlayerDto::from).collect())
    }

    async fn find_by_id(&self, id: Id) -> Result<PlayerDto, ServiceError> {
        Ok(PlayerDto::from(&self.players.find_by_id(id).await?))
    }

    async fn create(&self, input: PlayerInput) -> Result<PlayerDto, ServiceError> {
        let player = input.validate()?;
        ensure_exists(&self.teams, player.team_id).await?;

        let id = self.players.create(&player).await?;
        tracing::debug!(id, team_id = player.team_id, "Created player");
        self.find_by_id(id).await
    }

    async fn update(&self, id: Id, input: PlayerInput) -> Result<PlayerDto, ServiceError> {
        let player = input.validate()?;
        self.players.find_by_id(id).await?;
        ensure_exists(&self.teams, player.team_id).await?;

        let rows = self.players.update(&Entity::new(id, player)).await?;
        affected(rows, Player::KIND, id)?;
        self.find_by_id(id).await
    }

    async fn delete(&self, id: Id) -> Result<(), ServiceError> {
        deleted(self.players.delete(id).await, Player::KIND, id)
    }
}
