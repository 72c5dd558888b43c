//! Loans repository for database operations

use sqlx::{Pool, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::loan::{CreateLoan, Loan},
};

use super::books::take_copy;

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Sqlite>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Get loan by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Loan> {
        sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))
    }

    /// List every loan in storage order
    pub async fn list(&self) -> AppResult<Vec<Loan>> {
        let loans = sqlx::query_as::<_, Loan>("SELECT * FROM loans ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(loans)
    }

    /// Get loans for a student
    pub async fn list_for_student(&self, student_id: i64) -> AppResult<Vec<Loan>> {
        let loans = sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE student_id = ? ORDER BY id")
            .bind(student_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(loans)
    }

    /// Create a loan and take one copy of the book in a single transaction.
    ///
    /// Either both the decrement and the loan row are committed, or neither
    /// is. Storage faults inside the transaction surface as `TransactionFailure`.
    pub async fn create(&self, loan: &CreateLoan) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await.map_err(AppError::TransactionFailure)?;

        let taken = take_copy(&mut tx, loan.book_id)
            .await
            .map_err(AppError::TransactionFailure)?;

        if taken.is_none() {
            tx.rollback().await.map_err(AppError::TransactionFailure)?;
            return Err(self.missing_copy_error(loan.book_id).await?);
        }

        let created = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (student_id, book_id, loan_date, due_date, status)
            VALUES (?, ?, ?, ?, 'active')
            RETURNING *
            "#,
        )
        .bind(loan.student_id)
        .bind(loan.book_id)
        .bind(loan.loan_date)
        .bind(loan.due_date())
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::TransactionFailure)?;

        tx.commit().await.map_err(AppError::TransactionFailure)?;

        Ok(created)
    }

    /// Tell an absent book from an exhausted one after a refused checkout
    async fn missing_copy_error(&self, book_id: i64) -> AppResult<AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = ?)")
            .bind(book_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(if exists {
            AppError::Unavailable(book_id)
        } else {
            AppError::BookNotFound(book_id)
        })
    }

    /// Count loans
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM loans")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{
        models::{
            book::CreateBook,
            principal::{NewPrincipal, PrincipalKind},
        },
        repository::{testing, Repository},
    };

    async fn seeded(available: i64) -> (Repository, i64, i64) {
        let repo = testing::repository().await;
        let student = repo
            .principals
            .create(
                PrincipalKind::Student,
                &NewPrincipal {
                    name: "João".to_string(),
                    email: "joao@escola.br".to_string(),
                    password: "hash".to_string(),
                    serie: None,
                },
            )
            .await
            .unwrap();
        let book = repo
            .books
            .create(&CreateBook {
                title: "O Cortiço".to_string(),
                author: Some("Aluísio Azevedo".to_string()),
                available,
            })
            .await
            .unwrap();
        (repo, student.id, book.id)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[tokio::test]
    async fn create_takes_one_copy() {
        let (repo, student_id, book_id) = seeded(3).await;

        let loan = repo
            .loans
            .create(&CreateLoan { student_id, book_id, loan_date: today() })
            .await
            .unwrap();

        assert_eq!(loan.due_date, NaiveDate::from_ymd_opt(2025, 3, 17).unwrap());
        assert_eq!(repo.loans.get_by_id(loan.id).await.unwrap(), loan);
        assert_eq!(repo.books.get_by_id(book_id).await.unwrap().unwrap().available, 2);
        assert_eq!(repo.loans.list_for_student(student_id).await.unwrap(), vec![loan]);
    }

    #[tokio::test]
    async fn exhausted_book_is_unavailable() {
        let (repo, student_id, book_id) = seeded(0).await;

        let err = repo
            .loans
            .create(&CreateLoan { student_id, book_id, loan_date: today() })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Unavailable(id) if id == book_id));
        assert_eq!(repo.loans.count().await.unwrap(), 0);
        assert_eq!(repo.books.get_by_id(book_id).await.unwrap().unwrap().available, 0);
    }

    #[tokio::test]
    async fn failed_insert_rolls_back_the_decrement() {
        let (repo, _, book_id) = seeded(1).await;

        // Unknown student violates the foreign key after the copy was taken.
        let err = repo
            .loans
            .create(&CreateLoan { student_id: 9999, book_id, loan_date: today() })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::TransactionFailure(_)));
        assert_eq!(repo.books.get_by_id(book_id).await.unwrap().unwrap().available, 1);
        assert_eq!(repo.loans.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn unknown_book() {
        let (repo, student_id, _) = seeded(1).await;

        let err = repo
            .loans
            .create(&CreateLoan { student_id, book_id: 777, loan_date: today() })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BookNotFound(777)));
    }
}
