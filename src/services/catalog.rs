//! Catalog service

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, CreateBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All books in storage order
    pub async fn list(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    /// Get book by ID
    pub async fn get(&self, id: i64) -> AppResult<Book> {
        self.repository
            .books
            .get_by_id(id)
            .await?
            .ok_or(AppError::BookNotFound(id))
    }

    /// Take one copy out of circulation
    pub async fn decrement_availability(&self, id: i64) -> AppResult<Book> {
        self.repository.books.decrement_availability(id).await
    }

    /// Add a book to the catalog
    pub async fn create(&self, book: CreateBook) -> AppResult<Book> {
        let created = self.repository.books.create(&book).await?;
        tracing::info!(book_id = created.id, title = %created.title, "Book added to catalog");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::testing;

    async fn service_with_book(available: i64) -> (CatalogService, Book) {
        let service = CatalogService::new(testing::repository().await);
        let book = service
            .create(CreateBook {
                title: "A Moreninha".to_string(),
                author: Some("Joaquim Manuel de Macedo".to_string()),
                available,
            })
            .await
            .unwrap();
        (service, book)
    }

    #[tokio::test]
    async fn decrement_stops_at_zero() {
        let (service, book) = service_with_book(3).await;

        for expected in [2, 1, 0] {
            assert_eq!(service.decrement_availability(book.id).await.unwrap().available, expected);
        }

        let err = service.decrement_availability(book.id).await.unwrap_err();
        assert!(matches!(err, AppError::AvailabilityError(id) if id == book.id));
        assert_eq!(service.get(book.id).await.unwrap().available, 0);
    }

    #[tokio::test]
    async fn unknown_book() {
        let (service, _) = service_with_book(1).await;

        assert!(matches!(service.get(42).await.unwrap_err(), AppError::BookNotFound(42)));
        assert!(matches!(
            service.decrement_availability(42).await.unwrap_err(),
            AppError::BookNotFound(42)
        ));
    }
}
