//! Service layer: orchestration between the HTTP boundary and repositories.
//!
//! This module is organized into:
//! - named: name-only records, plus the book owners whose delete cascades
//! - book / library: the library domain
//! - team / player / matches: the league domain
//!
//! Every service implements [`CrudService`]. Services own cross-entity
//! existence checks and record → DTO conversion; each check runs before the
//! write it gates, so a failed check never leaves a partial write behind.

mod book;
mod library;
mod matches;
mod named;
mod player;
mod team;

use std::future::Future;

use clubhouse_model::{Author, Category, Coach, FieldErrors, Id, League, Publisher};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::persistence::sqlite::{
    Database, SqliteBookRepository, SqliteLibraryRepository, SqliteMatchRepository,
    SqliteNamedRepository, SqlitePlayerRepository, SqliteTeamRepository,
};
use crate::persistence::{BookOwner, PersistenceError, Repository};

pub use book::BookService;
pub use library::LibraryService;
pub use matches::MatchService;
pub use named::{NamedService, OwnerService};
pub use player::PlayerService;
pub use team::TeamService;

/// Errors surfaced by services to the boundary.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The requested identifier, or one it references, does not exist.
    #[error("{kind} not found with id: {id}")]
    NotFound { kind: &'static str, id: Id },
    /// The request was well-formed but cannot be applied.
    #[error("{0}")]
    InvalidArgument(String),
    /// The input failed field validation.
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
    /// Anything else. Details are logged, never returned to the caller.
    #[error("internal error: {0}")]
    Internal(PersistenceError),
}

impl From<PersistenceError> for ServiceError {
    fn from(e: PersistenceError) -> Self {
        match e {
            PersistenceError::RowNotFound { kind, id } => ServiceError::NotFound { kind, id },
            PersistenceError::ConstraintViolation(msg) => {
                tracing::warn!(store = %msg, "Write rejected by a foreign key");
                ServiceError::InvalidArgument(
                    "Operation rejected, a referenced record is missing or still in use".into(),
                )
            }
            other => ServiceError::Internal(other),
        }
    }
}

impl From<FieldErrors> for ServiceError {
    fn from(errors: FieldErrors) -> Self {
        ServiceError::Validation(errors)
    }
}

/// Create / read / update / delete over one resource, in transfer shapes.
pub trait CrudService: Send + Sync {
    /// Request body of create and update.
    type Input: DeserializeOwned + Send;
    /// Response body of reads, create and update.
    type Output: Serialize + Send;

    fn find_all(&self) -> impl Future<Output = Result<Vec<Self::Output>, ServiceError>> + Send;

    fn find_by_id(&self, id: Id)
        -> impl Future<Output = Result<Self::Output, ServiceError>> + Send;

    /// Validate, check references, insert, then return the stored view.
    fn create(
        &self,
        input: Self::Input,
    ) -> impl Future<Output = Result<Self::Output, ServiceError>> + Send;

    /// Full overwrite of the record with `id`. The target must exist.
    fn update(
        &self,
        id: Id,
        input: Self::Input,
    ) -> impl Future<Output = Result<Self::Output, ServiceError>> + Send;

    fn delete(&self, id: Id) -> impl Future<Output = Result<(), ServiceError>> + Send;
}

/// Existence check: succeeds only if `repo` holds a row with `id`.
pub(crate) async fn ensure_exists<R: Repository>(repo: &R, id: Id) -> Result<(), ServiceError> {
    repo.find_by_id(id).await?;
    Ok(())
}

/// Turn a zero rows-affected count into `NotFound` for `kind`.
pub(crate) fn affected(rows: u64, kind: &'static str, id: Id) -> Result<(), ServiceError> {
    if rows == 0 {
        return Err(ServiceError::NotFound { kind, id });
    }
    Ok(())
}

/// Outcome of a delete: zero rows is `NotFound`, a foreign-key rejection
/// names the record that is still referenced.
pub(crate) fn deleted(
    result: Result<u64, PersistenceError>,
    kind: &'static str,
    id: Id,
) -> Result<(), ServiceError> {
    match result {
        Ok(rows) => affected(rows, kind, id),
        Err(PersistenceError::ConstraintViolation(msg)) => {
            tracing::warn!(kind, id, store = %msg, "Delete rejected, record still referenced");
            Err(ServiceError::InvalidArgument(format!(
                "{kind} with id {id} is still referenced and cannot be deleted"
            )))
        }
        Err(e) => Err(e.into()),
    }
}

type Named<T> = SqliteNamedRepository<T>;

/// Every service, wired to the SQLite repositories at start-up.
#[derive(Clone)]
pub struct Services {
    pub authors: OwnerService<Named<Author>, SqliteBookRepository>,
    pub publishers: OwnerService<Named<Publisher>, SqliteBookRepository>,
    pub categories: NamedService<Named<Category>>,
    pub books: BookService<
        SqliteBookRepository,
        Named<Author>,
        Named<Publisher>,
        Named<Category>,
    >,
    pub libraries: LibraryService<SqliteLibraryRepository>,
    pub coaches: NamedService<Named<Coach>>,
    pub leagues: NamedService<Named<League>>,
    pub teams: TeamService<
        SqliteTeamRepository,
        Named<Coach>,
        Named<League>,
        SqlitePlayerRepository,
        SqliteMatchRepository,
    >,
    pub players: PlayerService<SqlitePlayerRepository, SqliteTeamRepository>,
    pub matches: MatchService<SqliteMatchRepository, SqliteTeamRepository>,
}

impl Services {
    pub fn new(db: &Database) -> Self {
        let pool = db.pool();

        let authors = Named::<Author>::new(pool.clone());
        let publishers = Named::<Publisher>::new(pool.clone());
        let categories = Named::<Category>::new(pool.clone());
        let books = SqliteBookRepository::new(pool.clone());
        let libraries = SqliteLibraryRepository::new(pool.clone());
        let coaches = Named::<Coach>::new(pool.clone());
        let leagues = Named::<League>::new(pool.clone());
        let teams = SqliteTeamRepository::new(pool.clone());
        let players = SqlitePlayerRepository::new(pool.clone());
        let matches = SqliteMatchRepository::new(pool.clone());

        Self {
            authors: OwnerService::new(authors.clone(), books.clone(), BookOwner::Author),
            publishers: OwnerService::new(
                publishers.clone(),
                books.clone(),
                BookOwner::Publisher,
            ),
            categories: NamedService::new(categories.clone()),
            books: BookService::new(books, authors, publishers, categories),
            libraries: LibraryService::new(libraries),
            coaches: NamedService::new(coaches.clone()),
            leagues: NamedService::new(leagues.clone()),
            teams: TeamService::new(
                teams.clone(),
                coaches,
                leagues,
                players.clone(),
                matches.clone(),
            ),
            players: PlayerService::new(players, teams.clone()),
            matches: MatchService::new(matches, teams),
        }
    }
}
