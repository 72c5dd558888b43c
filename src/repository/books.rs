//! Books repository for database operations

use sqlx::{Pool, Sqlite, SqliteConnection};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, CreateBook},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Sqlite>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// List books in storage order
    pub async fn list(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>("SELECT id, title, author, available FROM books ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(books)
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>("SELECT id, title, author, available FROM books WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(book)
    }

    /// Add a book to the catalog
    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        if book.available < 0 {
            return Err(AppError::Validation("available must not be negative".to_string()));
        }

        let created = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, available)
            VALUES (?, ?, ?)
            RETURNING id, title, author, available
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.available)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Remove one available copy.
    /// Fails with `AvailabilityError` when no copy is left, `BookNotFound` when absent.
    pub async fn decrement_availability(&self, id: i64) -> AppResult<Book> {
        let taken = {
            let mut conn = self.pool.acquire().await?;
            take_copy(&mut conn, id).await?
        };

        match taken {
            Some(book) => Ok(book),
            None => match self.get_by_id(id).await? {
                Some(_) => Err(AppError::AvailabilityError(id)),
                None => Err(AppError::BookNotFound(id)),
            },
        }
    }
}

/// Conditionally take one copy of a book on the given connection.
///
/// The guard lives in the `WHERE` clause, so the check and the write are a
/// single statement and the count can never go below zero. Returns `None`
/// when the book is absent or has no copy left.
pub async fn take_copy(conn: &mut SqliteConnection, id: i64) -> Result<Option<Book>, sqlx::Error> {
    sqlx::query_as::<_, Book>(
        r#"
        UPDATE books
        SET available = available - 1
        WHERE id = ? AND available > 0
        RETURNING id, title, author, available
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await
}
