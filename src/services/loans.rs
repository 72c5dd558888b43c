//! Loan management service

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::{
        loan::{CreateLoan, Loan},
        principal::Principal,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All loans in storage order
    pub async fn list(&self) -> AppResult<Vec<Loan>> {
        self.repository.loans.list().await
    }

    /// Loans held by a student
    pub async fn list_for_student(&self, student_id: i64) -> AppResult<Vec<Loan>> {
        self.repository.loans.list_for_student(student_id).await
    }

    /// Borrow one copy of a book for the given student.
    ///
    /// `Unavailable` is an expected outcome and leaves books and loans
    /// untouched. The decrement and the loan row are committed together.
    pub async fn borrow(&self, borrower: &Principal, book_id: i64) -> AppResult<Loan> {
        if !borrower.is_student() {
            return Err(AppError::Authorization(format!(
                "A {} cannot borrow books",
                borrower.kind()
            )));
        }

        let book = self
            .repository
            .books
            .get_by_id(book_id)
            .await?
            .ok_or(AppError::BookNotFound(book_id))?;

        if !book.is_available() {
            tracing::warn!(book_id, student_id = borrower.id, "Borrow refused: no copy available");
            return Err(AppError::Unavailable(book_id));
        }

        let request = CreateLoan {
            student_id: borrower.id,
            book_id,
            loan_date: Utc::now().date_naive(),
        };

        let loan = match self.repository.loans.create(&request).await {
            Ok(loan) => loan,
            Err(AppError::Unavailable(id)) => {
                // Another borrow took the last copy since the check above
                tracing::warn!(book_id = id, student_id = borrower.id, "Borrow refused: no copy available");
                return Err(AppError::Unavailable(id));
            }
            Err(e) => return Err(e),
        };

        tracing::info!(
            loan_id = loan.id,
            book_id,
            student_id = borrower.id,
            due_date = %loan.due_date,
            "Book borrowed"
        );

        Ok(loan)
    }
}
