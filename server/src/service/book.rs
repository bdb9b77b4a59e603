//! Book service: reference checks against authors, publishers and categories.

use clubhouse_model::{
    Author, Book, BookDto, BookInput, Category, Entity, Id, Publisher, Record, Validate,
};

use super::{affected, deleted, ensure_exists, CrudService, ServiceError};
use crate::persistence::Repository;

#[derive(Clone)]
pub struct BookService<B, A, P, C> {
    books: B,
    authors: A,
    publishers: P,
    categories: C,
}

impl<B, A, P, C> BookService<B, A, P, C>
where
    B: Repository<Record = Book>,
    A: Repository<Record = Author>,
    P: Repository<Record = Publisher>,
    C: Repository<Record = Category>,
{
    pub fn new(books: B, authors: A, publishers: P, categories: C) -> Self {
        Self {
            books,
            authors,
            publishers,
            categories,
        }
    }

    /// Author, publisher, then every category. The first miss aborts.
    async fn check_references(&self, book: &Book) -> Result<(), ServiceError> {
        ensure_exists(&self.authors, book.author_id).await?;
        ensure_exists(&self.publishers, book.publisher_id).await?;
        for &category_id in &book.category_ids {
            ensure_exists(&self.categories, category_id).await?;
        }
        Ok(())
    }
}

impl<B, A, P, C> CrudService for BookService<B, A, P, C>
where
    B: Repository<Record = Book>,
    A: Repository<Record = Author>,
    P: Repository<Record = Publisher>,
    C: Repository<Record = Category>,
{
    type Input = BookInput;
    type Output = BookDto;

    async fn find_all(&self) -> Result<Vec<BookDto>, ServiceError> {
        let all = self.books.find_all().await?;
        Ok(all.iter().map(BookDto::from).collect())
    }

    async fn find_by_id(&self, id: Id) -> Result<BookDto, ServiceError> {
        Ok(BookDto::from(&self.books.find_by_id(id).await?))
    }

    async fn create(&self, input: BookInput) -> Result<BookDto, ServiceError> {
        let book = input.validate()?;
        self.check_references(&book).await?;

        let id = self.books.create(&book).await?;
        tracing::debug!(id, title = %book.title, "Created book");
        self.find_by_id(id).await
    }

    async fn update(&self, id: Id, input: BookInput) -> Result<BookDto, ServiceError> {
        let book = input.validate()?;
        self.books.find_by_id(id).await?;
        self.check_references(&book).await?;

        let rows = self.books.update(&Entity::new(id, book)).await?;
        affected(rows, Book::KIND, id)?;
        self.find_by_id(id).await
    }

    async fn delete(&self, id: Id) -> Result<(), ServiceError> {
        deleted(self.books.delete(id).await, Book::KIND, id)
    }
}
