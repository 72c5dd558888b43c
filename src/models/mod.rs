//! Data models for Schoolib

pub mod book;
pub mod loan;
pub mod principal;
pub mod session;

// Re-export commonly used types
pub use book::Book;
pub use loan::{Loan, LoanStatus};
pub use principal::{Principal, PrincipalKind, Profile};
pub use session::Session;
