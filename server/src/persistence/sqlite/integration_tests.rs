use chrono::NaiveDate;
use clubhouse_model::{
    Author, Book, Category, Coach, Entity, Id, League, Library, Match, Player, Publisher, Team,
};

use super::{
    Database, SqliteBookRepository, SqliteLibraryRepository, SqliteMatchRepository,
    SqliteNamedRepository, SqlitePlayerRepository, SqliteTeamRepository,
};
use crate::persistence::traits::{BookOwner, BookRepository, Repository};
use crate::persistence::PersistenceError;

/// Insert a coach, a league and a team using them; returns the team id.
pub(crate) async fn seed_team(db: &Database, name: &str) -> Id {
    let pool = db.pool().clone();
    let coach_id = SqliteNamedRepository::<Coach>::new(pool.clone())
        .create(&Coach {
            name: format!("{name} coach"),
        })
        .await
        .unwrap();
    let league_id = SqliteNamedRepository::<League>::new(pool.clone())
        .create(&League {
            name: format!("{name} league"),
        })
        .await
        .unwrap();
    SqliteTeamRepository::new(pool)
        .create(&Team {
            name: name.to_string(),
            coach_id,
            league_id,
        })
        .await
        .unwrap()
}

async fn seed_book(db: &Database, title: &str) -> (Id, Id, Id) {
    let pool = db.pool().clone();
    let author = SqliteNamedRepository::<Author>::new(pool.clone())
        .create(&Author {
            name: "Ursula K. Le Guin".into(),
        })
        .await
        .unwrap();
    let publisher = SqliteNamedRepository::<Publisher>::new(pool.clone())
        .create(&Publisher {
            name: "Ace".into(),
        })
        .await
        .unwrap();
    let book = SqliteBookRepository::new(pool)
        .create(&Book {
            title: title.to_string(),
            author_id: author,
            publisher_id: publisher,
            category_ids: Default::default(),
        })
        .await
        .unwrap();
    (book, author, publisher)
}

#[tokio::test]
async fn test_publisher_cascade_keeps_other_publishers_books() {
    let db = Database::new_in_memory().await.unwrap();
    let (_, author, doomed) = seed_book(&db, "The Dispossessed").await;
    let books = SqliteBookRepository::new(db.pool().clone());
    let publishers = SqliteNamedRepository::<Publisher>::new(db.pool().clone());

    let survivor_publisher = publishers
        .create(&Publisher {
            name: "Harper".into(),
        })
        .await
        .unwrap();
    let survivor = books
        .create(&Book {
            title: "Lathe of Heaven".into(),
            author_id: author,
            publisher_id: survivor_publisher,
            category_ids: Default::default(),
        })
        .await
        .unwrap();

    books
        .delete_owner_cascading(BookOwner::Publisher, doomed)
        .await
        .unwrap();

    let remaining = books.find_all().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, survivor);
    assert_eq!(publishers.find_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_category_in_use_cannot_be_deleted() {
    let db = Database::new_in_memory().await.unwrap();
    let (book_id, author, publisher) = seed_book(&db, "Earthsea").await;
    let categories = SqliteNamedRepository::<Category>::new(db.pool().clone());
    let books = SqliteBookRepository::new(db.pool().clone());

    let fantasy = categories
        .create(&Category {
            name: "Fantasy".into(),
        })
        .await
        .unwrap();
    books
        .update(&Entity::new(
            book_id,
            Book {
                title: "Earthsea".into(),
                author_id: author,
                publisher_id: publisher,
                category_ids: [fantasy].into(),
            },
        ))
        .await
        .unwrap();

    let result = categories.delete(fantasy).await;
    assert!(matches!(result, Err(PersistenceError::ConstraintViolation(_))));
    assert!(categories.find_by_id(fantasy).await.is_ok());
}

#[tokio::test]
async fn test_library_outlives_deleted_book() {
    let db = Database::new_in_memory().await.unwrap();
    let (book_id, _, _) = seed_book(&db, "Tehanu").await;
    let books = SqliteBookRepository::new(db.pool().clone());
    let libraries = SqliteLibraryRepository::new(db.pool().clone());

    let library = libraries
        .create(&Library {
            name: "Branch".into(),
            book_ids: vec![book_id],
        })
        .await
        .unwrap();
    assert_eq!(books.delete(book_id).await.unwrap(), 1);

    let loaded = libraries.find_by_id(library).await.unwrap();
    assert_eq!(loaded.data.book_ids, vec![book_id]);
}

#[tokio::test]
async fn test_team_with_dependents_cannot_be_deleted() {
    let db = Database::new_in_memory().await.unwrap();
    let team = seed_team(&db, "Rovers").await;
    let teams = SqliteTeamRepository::new(db.pool().clone());
    let players = SqlitePlayerRepository::new(db.pool().clone());

    let player = players
        .create(&Player {
            name: "Roy".into(),
            team_id: team,
        })
        .await
        .unwrap();

    assert!(matches!(
        teams.delete(team).await,
        Err(PersistenceError::ConstraintViolation(_))
    ));

    players.delete(player).await.unwrap();
    assert_eq!(teams.delete(team).await.unwrap(), 1);
}

#[tokio::test]
async fn test_concurrent_repo_access() {
    let db = Database::new_in_memory().await.unwrap();
    let home = seed_team(&db, "Home").await;
    let away = seed_team(&db, "Away").await;

    let players_pool = db.pool().clone();
    let matches_pool = db.pool().clone();

    let players_task = tokio::spawn(async move {
        let repo = SqlitePlayerRepository::new(players_pool);
        for i in 0..10 {
            repo.create(&Player {
                name: format!("Player {i}"),
                team_id: home,
            })
            .await
            .unwrap();
        }
    });

    let matches_task = tokio::spawn(async move {
        let repo = SqliteMatchRepository::new(matches_pool);
        let date = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(15, 0, 0)
            .unwrap();
        for i in 0..10 {
            repo.create(&Match {
                home_team_id: home,
                away_team_id: away,
                match_date: date,
                home_score: i,
                away_score: 0,
            })
            .await
            .unwrap();
        }
    });

    players_task.await.unwrap();
    matches_task.await.unwrap();

    let players = SqlitePlayerRepository::new(db.pool().clone());
    let matches = SqliteMatchRepository::new(db.pool().clone());
    assert_eq!(players.find_all().await.unwrap().len(), 10);
    assert_eq!(matches.find_all().await.unwrap().len(), 10);
}
