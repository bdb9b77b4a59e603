//! Match service.

use clubhouse_model::{Entity, Id, Match, MatchDto, MatchInput, Record, Team, Validate};

use super::{affected, deleted, ensure_exists, CrudService, ServiceError};
use crate::persistence::Repository;

#[derive(Clone)]
pub struct MatchService<M, T> {
    matches: M,
    teams: T,
}

impl<M, T> MatchService<M, T>
where
    M: Repository<Record = Match>,
    T: Repository<Record = Team>,
{
    pub fn new(matches: M, teams: T) -> Self {
        Self { matches, teams }
    }

    /// Home team first, then away team.
    async fn check_teams(&self, m: &Match) -> Result<(), ServiceError> {
        ensure_exists(&self.teams, m.home_team_id).await?;
        ensure_exists(&self.teams, m.away_team_id).await
    }
}

impl<M, T> CrudService for MatchService<M, T>
where
    M: Repository<Record = Match>,
    T: Repository<Record = Team>,
{
    type Input = MatchInput;
    type Output = MatchDto;

    async fn find_all(&self) -> Result<Vec<MatchDto>, ServiceError> {
        let all = self.matches.find_all().await?;
        Ok(all.iter().map(MatchDto::from).collect())
    }

    async fn find_by_id(&self, id: Id) -> Result<MatchDto, ServiceError> {
        Ok(MatchDto::from(&self.matches.find_by_id(id).await?))
    }

    async fn create(&self, input: MatchInput) -> Result<MatchDto, ServiceError> {
        let m = input.validate()?;
        self.check_teams(&m).await?;

        let id = self.matches.create(&m).await?;
        tracing::debug!(id, home = m.home_team_id, away = m.away_team_id, "Created match");
        self.find_by_id(id).await
    }

    async fn update(&self, id: Id, input: MatchInput) -> Result<MatchDto, ServiceError> {
        let m = input.validate()?;
        self.matches.find_by_id(id).await?;
        self.check_teams(&m).await?;

        let rows = self.matches.update(&Entity::new(id, m)).await?;
        affected(rows, Match::KIND, id)?;
        self.find_by_id(id).await
    }

    async fn delete(&self, id: Id) -> Result<(), ServiceError> {
        deleted(self.matches.delete(id).await, Match::KIND, id)
    }
}
