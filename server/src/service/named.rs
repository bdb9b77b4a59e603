//! Services for name-only records.

use clubhouse_model::{Entity, Id, NameInput, NamedDto, NamedRecord, Record};

use super::{affected, deleted, CrudService, ServiceError};
use crate::persistence::{BookOwner, BookRepository, Repository};

/// CRUD over a name-only record (categories, coaches, leagues).
#[derive(Clone)]
pub struct NamedService<R> {
    repo: R,
}

impl<R> NamedService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }
}

impl<R> CrudService for NamedService<R>
where
    R: Repository,
    R::Record: NamedRecord,
{
    type Input = NameInput;
    type Output = NamedDto;

    async fn find_all(&self) -> Result<Vec<NamedDto>, ServiceError> {
        let all = self.repo.find_all().await?;
        Ok(all.iter().map(NamedDto::from).collect())
    }

    async fn find_by_id(&self, id: Id) -> Result<NamedDto, ServiceError> {
        let entity = self.repo.find_by_id(id).await?;
        Ok(NamedDto::from(&entity))
    }

    async fn create(&self, input: NameInput) -> Result<NamedDto, ServiceError> {
        let record: R::Record = input.into_record()?;
        let id = self.repo.create(&record).await?;
        tracing::debug!(kind = <R::Record as Record>::KIND, id, "Created record");
        self.find_by_id(id).await
    }

    async fn update(&self, id: Id, input: NameInput) -> Result<NamedDto, ServiceError> {
        let record: R::Record = input.into_record()?;
        self.repo.find_by_id(id).await?;

        let rows = self.repo.update(&Entity::new(id, record)).await?;
        affected(rows, <R::Record as Record>::KIND, id)?;
        self.find_by_id(id).await
    }

    async fn delete(&self, id: Id) -> Result<(), ServiceError> {
        deleted(self.repo.delete(id).await, <R::Record as Record>::KIND, id)?;
        tracing::debug!(kind = <R::Record as Record>::KIND, id, "Deleted record");
        Ok(())
    }
}

/// Authors and publishers: name-only records that own books.
///
/// Deleting an owner deletes its books first, in one transaction.
#[derive(Clone)]
pub struct OwnerService<R, B> {
    named: NamedService<R>,
    books: B,
    owner: BookOwner,
}

impl<R, B> OwnerService<R, B> {
    pub fn new(repo: R, books: B, owner: BookOwner) -> Self {
        Self {
            named: NamedService::new(repo),
            books,
            owner,
        }
    }
}

impl<R, B> CrudService for OwnerService<R, B>
where
    R: Repository,
    R::Record: NamedRecord,
    B: BookRepository,
{
    type Input = NameInput;
    type Output = NamedDto;

    async fn find_all(&self) -> Result<Vec<NamedDto>, ServiceError> {
        self.named.find_all().await
    }

    async fn find_by_id(&self, id: Id) -> Result<NamedDto, ServiceError> {
        self.named.find_by_id(id).await
    }

    async fn create(&self, input: NameInput) -> Result<NamedDto, ServiceError> {
        self.named.create(input).await
    }

    async fn update(&self, id: Id, input: NameInput) -> Result<NamedDto, ServiceError> {
        self.named.update(id, input).await
    }

    async fn delete(&self, id: Id) -> Result<(), ServiceError> {
        deleted(
            self.books.delete_owner_cascading(self.owner, id).await,
            <R::Record as Record>::KIND,
            id,
        )?;
        tracing::info!(owner = ?self.owner, id, "Deleted owner and its books");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::sqlite::{Database, SqliteBookRepository, SqliteNamedRepository};
    use clubhouse_model::{Author, Book, League};

    fn name(s: &str) -> NameInput {
        NameInput {
            name: Some(s.to_string()),
        }
    }

    async fn leagues() -> (Database, NamedService<SqliteNamedRepository<League>>) {
        let db = Database::new_in_memory().await.unwrap();
        let service = NamedService::new(SqliteNamedRepository::new(db.pool().clone()));
        (db, service)
    }

    #[tokio::test]
    async fn test_create_returns_stored_view() {
        let (_db, service) = leagues().await;
        let dto = service.create(name("Premier League")).await.unwrap();
        assert_eq!(dto.name, "Premier League");
        assert_eq!(service.find_by_id(dto.id).await.unwrap(), dto);
    }

    #[tokio::test]
    async fn test_blank_name_is_a_validation_error() {
        let (_db, service) = leagues().await;
        let err = service.create(name("   ")).await.unwrap_err();
        match err {
            ServiceError::Validation(fields) => {
                assert_eq!(fields.get("name"), Some("League name must not be blank"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(service.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_nonexistent_is_not_found_without_write() {
        let (_db, service) = leagues().await;
        let err = service.update(42, name("Ghost")).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { kind: "League", id: 42 }));
        assert!(service.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_then_find_is_not_found() {
        let (_db, service) = leagues().await;
        let dto = service.create(name("Serie A")).await.unwrap();
        service.delete(dto.id).await.unwrap();
        assert!(matches!(
            service.find_by_id(dto.id).await,
            Err(ServiceError::NotFound { .. })
        ));
        assert!(matches!(
            service.delete(dto.id).await,
            Err(ServiceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_owner_delete_removes_owned_books() {
        let db = Database::new_in_memory().await.unwrap();
        let pool = db.pool().clone();
        let books = SqliteBookRepository::new(pool.clone());
        let authors = OwnerService::new(
            SqliteNamedRepository::<Author>::new(pool.clone()),
            books.clone(),
            BookOwner::Author,
        );

        let author = authors.create(name("Iain Banks")).await.unwrap();
        let publisher = SqliteNamedRepository::<clubhouse_model::Publisher>::new(pool)
            .create(&clubhouse_model::Publisher {
                name: "Orbit".into(),
            })
            .await
            .unwrap();
        books
            .create(&Book {
                title: "Excession".into(),
                author_id: author.id,
                publisher_id: publisher,
                category_ids: Default::default(),
            })
            .await
            .unwrap();

        authors.delete(author.id).await.unwrap();
        assert!(books.find_all().await.unwrap().is_empty());
        assert!(matches!(
            authors.delete(author.id).await,
            Err(ServiceError::NotFound { kind: "Author", .. })
        ));
    }
}
