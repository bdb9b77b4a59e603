use std::collections::BTreeSet;

use chrono::NaiveDateTime;

use crate::{Id, NamedRecord, Record};

// ── Library domain ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publisher {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
}

/// A book references one author, one publisher and any number of categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub title: String,
    pub author_id: Id,
    pub publisher_id: Id,
    /// Set semantics: duplicates collapse, ordering carries no meaning.
    pub category_ids: BTreeSet<Id>,
}

/// A library holds raw book identifiers. They are not checked against books.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Library {
    pub name: String,
    pub book_ids: Vec<Id>,
}

// ── League domain ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coach {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct League {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub name: String,
    pub coach_id: Id,
    pub league_id: Id,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    pub team_id: Id,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub home_team_id: Id,
    pub away_team_id: Id,
    pub match_date: NaiveDateTime,
    pub home_score: i32,
    pub away_score: i32,
}

impl Match {
    /// Whether the given team played in this match, home or away.
    pub fn involves(&self, team_id: Id) -> bool {
        self.home_team_id == team_id || self.away_team_id == team_id
    }
}

// ── Record impls ───────────────────────────────────────────────────────

impl Record for Author {
    const KIND: &'static str = "Author";
}

impl Record for Publisher {
    const KIND: &'static str = "Publisher";
}

impl Record for Category {
    const KIND: &'static str = "Category";
}

impl Record for Book {
    const KIND: &'static str = "Book";
}

impl Record for Library {
    const KIND: &'static str = "Library";
}

impl Record for Coach {
    const KIND: &'static str = "Coach";
}

impl Record for League {
    const KIND: &'static str = "League";
}

impl Record for Team {
    const KIND: &'static str = "Team";
}

impl Record for Player {
    const KIND: &'static str = "Player";
}

impl Record for Match {
    const KIND: &'static str = "Match";
}

impl NamedRecord for Author {
    fn from_name(name: String) -> Self {
        Self { name }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl NamedRecord for Publisher {
    fn from_name(name: String) -> Self {
        Self { name }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl NamedRecord for Category {
    fn from_name(name: String) -> Self {
        Self { name }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl NamedRecord for Coach {
    fn from_name(name: String) -> Self {
        Self { name }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl NamedRecord for League {
    fn from_name(name: String) -> Self {
        Self { name }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn match_involves_home_and_away() {
        let m = Match {
            home_team_id: 1,
            away_team_id: 2,
            match_date: NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(18, 30, 0)
                .unwrap(),
            home_score: 2,
            away_score: 1,
        };
        assert!(m.involves(1));
        assert!(m.involves(2));
        assert!(!m.involves(3));
    }

    #[test]
    fn book_category_ids_collapse_duplicates() {
        let book = Book {
            title: "Dune".to_string(),
            author_id: 1,
            publisher_id: 1,
            category_ids: [3, 1, 3].into_iter().collect(),
        };
        assert_eq!(book.category_ids.len(), 2);
    }
}
