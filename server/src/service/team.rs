//! Team service and the denormalized team view.

use clubhouse_model::{
    Coach, Entity, Id, League, Match, MatchDto, NamedDto, Player, PlayerDto, Record, Team,
    TeamDraft, TeamDto, TeamInput, Validate,
};

use super::{affected, deleted, ensure_exists, CrudService, ServiceError};
use crate::persistence::Repository;

#[derive(Clone)]
pub struct TeamService<T, C, L, P, M> {
    teams: T,
    coaches: C,
    leagues: L,
    players: P,
    matches: M,
}

impl<T, C, L, P, M> TeamService<T, C, L, P, M>
where
    T: Repository<Record = Team>,
    C: Repository<Record = Coach>,
    L: Repository<Record = League>,
    P: Repository<Record = Player>,
    M: Repository<Record = Match>,
{
    pub fn new(teams: T, coaches: C, leagues: L, players: P, matches: M) -> Self {
        Self {
            teams,
            coaches,
            leagues,
            players,
            matches,
        }
    }

    /// Coach, league, then every listed player. Player ids are only checked;
    /// the players keep whatever team they already belong to.
    async fn check_references(&self, draft: &TeamDraft) -> Result<(), ServiceError> {
        ensure_exists(&self.coaches, draft.team.coach_id).await?;
        ensure_exists(&self.leagues, draft.team.league_id).await?;
        for &player_id in &draft.player_ids {
            ensure_exists(&self.players, player_id).await?;
        }
        Ok(())
    }

    /// Expand coach and league, and pick this team's players and matches
    /// out of the full tables.
    async fn view(
        &self,
        team: &Entity<Team>,
        players: &[Entity<Player>],
        matches: &[Entity<Match>],
    ) -> Result<TeamDto, ServiceError> {
        let coach = self.coaches.find_by_id(team.data.coach_id).await?;
        let league = self.leagues.find_by_id(team.data.league_id).await?;

        Ok(TeamDto {
            id: team.id,
            name: team.data.name.clone(),
            coach: NamedDto::from(&coach),
            league: NamedDto::from(&league),
            players: players
                .iter()
                .filter(|p| p.data.team_id == team.id)
                .map(PlayerDto::from)
                .collect(),
            matches: matches
                .iter()
                .filter(|m| m.data.involves(team.id))
                .map(MatchDto::from)
                .collect(),
        })
    }
}

impl<T, C, L, P, M> CrudService for TeamService<T, C, L, P, M>
where
    T: Repository<Record = Team>,
    C: Repository<Record = Coach>,
    L: Repository<Record = League>,
    P: Repository<Record = Player>,
    M: Repository<Record = Match>,
{
    type Input = TeamInput;
    type Output = TeamDto;

    async fn find_all(&self) -> Result<Vec<TeamDto>, ServiceError> {
        let teams = self.teams.find_all().await?;
        let players = self.players.find_all().await?;
        let matches = self.matches.find_all().await?;

        let mut views = Vec::with_capacity(teams.len());
        for team in &teams {
            views.push(self.view(team, &players, &matches).await?);
        }
        Ok(views)
    }

    async fn find_by_id(&self, id: Id) -> Result<TeamDto, ServiceError> {
        let team = self.teams.find_by_id(id).await?;
        let players = self.players.find_all().await?;
        let matches = self.matches.find_all().await?;
        self.view(&team, &players, &matches).await
    }

    async fn create(&self, input: TeamInput) -> Result<TeamDto, ServiceError> {
        let draft = input.validate()?;
        self.check_references(&draft).await?;

        let id = self.teams.create(&draft.team).await?;
        tracing::debug!(id, name = %draft.team.name, "Created team");
        self.find_by_id(id).await
    }

    async fn update(&self, id: Id, input: TeamInput) -> Result<TeamDto, ServiceError> {
        let draft = input.validate()?;
        self.teams.find_by_id(id).await?;
        self.check_references(&draft).await?;

        let rows = self.teams.update(&Entity::new(id, draft.team)).await?;
        affected(rows, Team::KIND, id)?;
        self.find_by_id(id).await
    }

    async fn delete(&self, id: Id) -> Result<(), ServiceError> {
        deleted(self.teams.delete(id).await, Team::KIND, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::sqlite::Database;
    use crate::service::Services;
    use chrono::NaiveDate;
    use clubhouse_model::{MatchInput, NameInput, PlayerInput};

    struct Fixture {
        _db: Database,
        services: Services,
        coach: Id,
        league: Id,
    }

    async fn fixture() -> Fixture {
        let db = Database::new_in_memory().await.unwrap();
        let services = Services::new(&db);
        let coach = services
            .coaches
            .create(NameInput {
                name: Some("Pep".into()),
            })
            .await
            .unwrap()
            .id;
        let league = services
            .leagues
            .create(NameInput {
                name: Some("La Liga".into()),
            })
            .await
            .unwrap()
            .id;
        Fixture {
            _db: db,
            services,
            coach,
            league,
        }
    }

    fn team(f: &Fixture, name: &str) -> TeamInput {
        TeamInput {
            name: Some(name.into()),
            coach_id: Some(f.coach),
            league_id: Some(f.league),
            player_ids: None,
        }
    }

    #[tokio::test]
    async fn test_create_expands_coach_and_league() {
        let f = fixture().await;
        let dto = f.services.teams.create(team(&f, "Barcelona")).await.unwrap();
        assert_eq!(dto.name, "Barcelona");
        assert_eq!(dto.coach.name, "Pep");
        assert_eq!(dto.league.name, "La Liga");
        assert!(dto.players.is_empty());
        assert!(dto.matches.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_coach_leaves_no_team_behind() {
        let f = fixture().await;
        let mut body = team(&f, "Phantoms");
        body.coach_id = Some(f.coach + 40);
        let err = f.services.teams.create(body).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { kind: "Coach", .. }));
        assert!(f.services.teams.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_league_leaves_no_team_behind() {
        let f = fixture().await;
        let mut body = team(&f, "Phantoms");
        body.league_id = Some(f.league + 40);
        let err = f.services.teams.create(body).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { kind: "League", .. }));
        assert!(f.services.teams.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_with_unknown_reference_keeps_team() {
        let f = fixture().await;
        let stored = f.services.teams.create(team(&f, "Barcelona")).await.unwrap();

        let mut bad_coach = team(&f, "Renamed");
        bad_coach.coach_id = Some(f.coach + 40);
        let err = f.services.teams.update(stored.id, bad_coach).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { kind: "Coach", .. }));

        let mut bad_league = team(&f, "Renamed");
        bad_league.league_id = Some(f.league + 40);
        let err = f.services.teams.update(stored.id, bad_league).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { kind: "League", .. }));

        assert_eq!(f.services.teams.find_by_id(stored.id).await.unwrap(), stored);
    }

    #[tokio::test]
    async fn test_unknown_player_id_rejected() {
        let f = fixture().await;
        let mut body = team(&f, "Phantoms");
        body.player_ids = Some(vec![31]);
        let err = f.services.teams.create(body).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { kind: "Player", id: 31 }));
    }

    #[tokio::test]
    async fn test_view_collects_players_and_matches() {
        let f = fixture().await;
        let home = f.services.teams.create(team(&f, "Home")).await.unwrap();
        let away = f.services.teams.create(team(&f, "Away")).await.unwrap();
        let other = f.services.teams.create(team(&f, "Other")).await.unwrap();

        for (name, team_id) in [("A", home.id), ("B", home.id), ("C", away.id)] {
            f.services
                .players
                .create(PlayerInput {
                    name: Some(name.into()),
                    team_id: Some(team_id),
                })
                .await
                .unwrap();
        }
        f.services
            .matches
            .create(MatchInput {
                home_team_id: Some(home.id),
                away_team_id: Some(away.id),
                match_date: NaiveDate::from_ymd_opt(2024, 3, 9)
                    .unwrap()
                    .and_hms_opt(20, 0, 0),
                home_score: Some(1),
                away_score: Some(1),
            })
            .await
            .unwrap();

        let home_view = f.services.teams.find_by_id(home.id).await.unwrap();
        assert_eq!(home_view.players.len(), 2);
        assert_eq!(home_view.matches.len(), 1);

        let away_view = f.services.teams.find_by_id(away.id).await.unwrap();
        assert_eq!(away_view.players.len(), 1);
        assert_eq!(away_view.matches.len(), 1);

        let other_view = f.services.teams.find_by_id(other.id).await.unwrap();
        assert!(other_view.players.is_empty());
        assert!(other_view.matches.is_empty());

        assert_eq!(f.services.teams.find_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_update_nonexistent_team() {
        let f = fixture().await;
        let err = f
            .services
            .teams
            .update(5, team(&f, "Nobody"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { kind: "Team", id: 5 }));
    }

    #[tokio::test]
    async fn test_delete_team_in_use_is_rejected() {
        let f = fixture().await;
        let dto = f.services.teams.create(team(&f, "Busy")).await.unwrap();
        f.services
            .players
            .create(PlayerInput {
                name: Some("Xavi".into()),
                team_id: Some(dto.id),
            })
            .await
            .unwrap();

        let err = f.services.teams.delete(dto.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(ref m) if m.contains("Team with id")));
        assert!(f.services.teams.find_by_id(dto.id).await.is_ok());
    }
}
