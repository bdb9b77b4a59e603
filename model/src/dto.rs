//! Boundary-facing transfer objects.
//!
//! Output shapes (`*Dto`) are built from stored records by pure conversion.
//! Input shapes (`*Input`) mirror the request bodies and are turned into
//! records through [`Validate`]. Field names are camelCase on the wire.

use std::collections::BTreeSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::validation::{FieldErrors, Validate};
use crate::{Book, Entity, Id, Library, Match, NamedRecord, Player, Team};

// ── Output shapes ──────────────────────────────────────────────────────

/// Transfer shape of every name-only record (authors, publishers,
/// categories, coaches, leagues).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedDto {
    pub id: Id,
    pub name: String,
}

impl<T: NamedRecord> From<&Entity<T>> for NamedDto {
    fn from(e: &Entity<T>) -> Self {
        Self {
            id: e.id,
            name: e.data.name().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDto {
    pub id: Id,
    pub title: String,
    pub author_id: Id,
    pub publisher_id: Id,
    pub category_ids: BTreeSet<Id>,
}

impl From<&Entity<Book>> for BookDto {
    fn from(e: &Entity<Book>) -> Self {
        Self {
            id: e.id,
            title: e.data.title.clone(),
            author_id: e.data.author_id,
            publisher_id: e.data.publisher_id,
            category_ids: e.data.category_ids.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryDto {
    pub id: Id,
    pub name: String,
    pub book_ids: Vec<Id>,
}

impl From<&Entity<Library>> for LibraryDto {
    fn from(e: &Entity<Library>) -> Self {
        Self {
            id: e.id,
            name: e.data.name.clone(),
            book_ids: e.data.book_ids.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDto {
    pub id: Id,
    pub name: String,
    pub team_id: Id,
}

impl From<&Entity<Player>> for PlayerDto {
    fn from(e: &Entity<Player>) -> Self {
        Self {
            id: e.id,
            name: e.data.name.clone(),
            team_id: e.data.team_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDto {
    pub id: Id,
    pub home_team_id: Id,
    pub away_team_id: Id,
    pub match_date: NaiveDateTime,
    pub home_score: i32,
    pub away_score: i32,
}

impl From<&Entity<Match>> for MatchDto {
    fn from(e: &Entity<Match>) -> Self {
        Self {
            id: e.id,
            home_team_id: e.data.home_team_id,
            away_team_id: e.data.away_team_id,
            match_date: e.data.match_date,
            home_score: e.data.home_score,
            away_score: e.data.away_score,
        }
    }
}

/// Denormalized team view: coach and league expanded, plus every player on
/// the team and every match the team played in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamDto {
    pub id: Id,
    pub name: String,
    pub coach: NamedDto,
    pub league: NamedDto,
    pub players: Vec<PlayerDto>,
    pub matches: Vec<MatchDto>,
}

// ── Input shapes ───────────────────────────────────────────────────────

/// Body of create/update requests for name-only records.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NameInput {
    pub name: Option<String>,
}

impl NameInput {
    /// Validate into a record of kind `T`; the message names the kind.
    pub fn into_record<T: NamedRecord>(self) -> Result<T, FieldErrors> {
        let mut errors = FieldErrors::new();
        let message = format!("{} name must not be blank", T::KIND);
        let name = errors.require_text("name", self.name, &message);
        errors.finish(|| name.map(T::from_name))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookInput {
    pub title: Option<String>,
    pub author_id: Option<Id>,
    pub publisher_id: Option<Id>,
    pub category_ids: Option<Vec<Id>>,
}

impl Validate for BookInput {
    type Valid = Book;

    fn validate(self) -> Result<Book, FieldErrors> {
        let mut errors = FieldErrors::new();
        let title = errors.require_text("title", self.title, "Book title must not be blank");
        let author_id = errors.require("authorId", self.author_id, "Author ID must not be null");
        let publisher_id =
            errors.require("publisherId", self.publisher_id, "Publisher ID must not be null");
        let category_ids: BTreeSet<Id> = self.category_ids.unwrap_or_default().into_iter().collect();

        errors.finish(|| {
            Some(Book {
                title: title?,
                author_id: author_id?,
                publisher_id: publisher_id?,
                category_ids,
            })
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryInput {
    pub name: Option<String>,
    pub book_ids: Option<Vec<Id>>,
}

impl Validate for LibraryInput {
    type Valid = Library;

    fn validate(self) -> Result<Library, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = errors.require_text("name", self.name, "Library name must not be blank");
        let book_ids = self.book_ids.unwrap_or_default();
        errors.finish(|| Some(Library { name: name?, book_ids }))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamInput {
    pub name: Option<String>,
    pub coach_id: Option<Id>,
    pub league_id: Option<Id>,
    /// Optional; a team may be created before any player joins it.
    pub player_ids: Option<Vec<Id>>,
}

/// A validated team request: the record to write plus the player ids the
/// request referenced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamDraft {
    pub team: Team,
    pub player_ids: Vec<Id>,
}

impl Validate for TeamInput {
    type Valid = TeamDraft;

    fn validate(self) -> Result<TeamDraft, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = errors.require_text("name", self.name, "Team name must not be blank");
        let coach_id = errors.require("coachId", self.coach_id, "Coach ID is required");
        let league_id = errors.require("leagueId", self.league_id, "League ID is required");
        let player_ids = self.player_ids.unwrap_or_default();

        errors.finish(|| {
            Some(TeamDraft {
                team: Team {
                    name: name?,
                    coach_id: coach_id?,
                    league_id: league_id?,
                },
                player_ids,
            })
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInput {
    pub name: Option<String>,
    pub team_id: Option<Id>,
}

impl Validate for PlayerInput {
    type Valid = Player;

    fn validate(self) -> Result<Player, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = errors.require_text("name", self.name, "Player name must not be blank");
        let team_id = errors.require("teamId", self.team_id, "Team ID is required");
        errors.finish(|| {
            Some(Player {
                name: name?,
                team_id: team_id?,
            })
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchInput {
    pub home_team_id: Option<Id>,
    pub away_team_id: Option<Id>,
    #[serde(default, deserialize_with = "local_date_time")]
    pub match_date: Option<NaiveDateTime>,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
}

impl Validate for MatchInput {
    type Valid = Match;

    fn validate(self) -> Result<Match, FieldErrors> {
        let mut errors = FieldErrors::new();
        let home_team_id =
            errors.require("homeTeamId", self.home_team_id, "Home team ID is required");
        let away_team_id =
            errors.require("awayTeamId", self.away_team_id, "Away team ID is required");
        let match_date = errors.require("matchDate", self.match_date, "Match date is required");
        let home_score = errors.require("homeScore", self.home_score, "Home score is required");
        let away_score = errors.require("awayScore", self.away_score, "Away score is required");

        errors.finish(|| {
            Some(Match {
                home_team_id: home_team_id?,
                away_team_id: away_team_id?,
                match_date: match_date?,
                home_score: home_score?,
                away_score: away_score?,
            })
        })
    }
}

/// ISO-8601 local date-time. Seconds and fractional seconds are optional.
pub fn parse_local_date_time(text: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M"))
}

fn local_date_time<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(text) => parse_local_date_time(&text)
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}
