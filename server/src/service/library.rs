//! Library service.
//!
//! Book ids held by a library are stored as submitted and never checked
//! against the books table.

use clubhouse_model::{Entity, Id, Library, LibraryDto, LibraryInput, Record, Validate};

use super::{affected, deleted, CrudService, ServiceError};
use crate::persistence::Repository;

#[derive(Clone)]
pub struct LibraryService<L> {
    libraries: L,
}

impl<L> LibraryService<L> {
    pub fn new(libraries: L) -> Self {
        Self { libraries }
    }
}

impl<L: Repository<Record = Library>> CrudService for LibraryService<L> {
    type Input = LibraryInput;
    type Output = LibraryDto;

    async fn find_all(&self) -> Result<Vec<LibraryDto>, ServiceError> {
        let all = self.libraries.find_all().await?;
        Ok(all.iter().map(LibraryDto::from).collect())
    }

    async fn find_by_id(&self, id: Id) -> Result<LibraryDto, ServiceError> {
        Ok(LibraryDto::from(&self.libraries.find_by_id(id).await?))
    }

    async fn create(&self, input: LibraryInput) -> Result<LibraryDto, ServiceError> {
        let library = input.validate()?;
        let id = self.libraries.create(&library).await?;
        tracing::debug!(id, books = library.book_ids.len(), "Created library");
        self.find_by_id(id).await
    }

    async fn update(&self, id: Id, input: LibraryInput) -> Result<LibraryDto, ServiceError> {
        let library = input.validate()?;
        self.libraries.find_by_id(id).await?;

        let rows = self.libraries.update(&Entity::new(id, library)).await?;
        affected(rows, Library::KIND, id)?;
        self.find_by_id(id).await
    }

    async fn delete(&self, id: Id) -> Result<(), ServiceError> {
        deleted(self.libraries.delete(id).await, Library::KIND, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::sqlite::{Database, SqliteLibraryRepository};

    async fn service() -> (Database, LibraryService<SqliteLibraryRepository>) {
        let db = Database::new_in_memory().await.unwrap();
        let service = LibraryService::new(SqliteLibraryRepository::new(db.pool().clone()));
        (db, service)
    }

    #[tokio::test]
    async fn test_unknown_book_ids_are_accepted() {
        let (_db, service) = service().await;
        let dto = service
            .create(LibraryInput {
                name: Some("Central".into()),
                book_ids: Some(vec![404, 405]),
            })
            .await
            .unwrap();
        assert_eq!(dto.book_ids, vec![404, 405]);
    }

    #[tokio::test]
    async fn test_update_and_delete_lifecycle() {
        let (_db, service) = service().await;
        let dto = service
            .create(LibraryInput {
                name: Some("Central".into()),
                book_ids: None,
            })
            .await
            .unwrap();
        assert!(dto.book_ids.is_empty());

        let updated = service
            .update(
                dto.id,
                LibraryInput {
                    name: Some("North".into()),
                    book_ids: Some(vec![1]),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "North");
        assert_eq!(updated.book_ids, vec![1]);

        service.delete(dto.id).await.unwrap();
        assert!(matches!(
            service.find_by_id(dto.id).await,
            Err(ServiceError::NotFound { kind: "Library", .. })
        ));
    }

    #[tokio::test]
    async fn test_update_missing_library() {
        let (_db, service) = service().await;
        let err = service
            .update(
                3,
                LibraryInput {
                    name: Some("Nowhere".into()),
                    book_ids: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { kind: "Library", id: 3 }));
    }
}
