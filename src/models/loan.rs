//! Loan (borrow) model and related types

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Fixed lending period
pub const LOAN_PERIOD_DAYS: i64 = 7;

/// Loan lifecycle. Creation is the only modeled transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum LoanStatus {
    Active,
}

/// Loan model from database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: i64,
    pub student_id: i64,
    pub book_id: i64,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: LoanStatus,
}

impl Loan {
    /// Due date for a loan starting on `loan_date`
    pub fn due_date_for(loan_date: NaiveDate) -> NaiveDate {
        loan_date + Duration::days(LOAN_PERIOD_DAYS)
    }
}

/// Loan creation request, built by the loans service
#[derive(Debug, Clone)]
pub struct CreateLoan {
    pub student_id: i64,
    pub book_id: i64,
    pub loan_date: NaiveDate,
}

impl CreateLoan {
    pub fn due_date(&self) -> NaiveDate {
        Loan::due_date_for(self.loan_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_date_is_one_week_later() {
        let start = NaiveDate::from_ymd_opt(2024, 12, 28).unwrap();
        assert_eq!(Loan::due_date_for(start), NaiveDate::from_ymd_opt(2025, 1, 4).unwrap());
    }
}
