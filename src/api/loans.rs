//! Loan endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, models::loan::Loan, AppState};

use super::AuthenticatedPrincipal;

/// Borrow outcome
#[derive(Serialize, ToSchema)]
pub struct BorrowResponse {
    pub message: String,
    pub loan: Loan,
}

/// Borrow one copy of a book for the authenticated student
#[utoipa::path(
    get,
    path = "/emprestar/{book_id}",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("book_id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 201, description = "Book borrowed", body = BorrowResponse),
        (status = 403, description = "Only students can borrow", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse),
        (status = 409, description = "No copy available", body = crate::error::ErrorResponse)
    )
)]
pub async fn borrow_book(
    State(state): State<AppState>,
    current: AuthenticatedPrincipal,
    Path(book_id): Path<i64>,
) -> AppResult<(StatusCode, Json<BorrowResponse>)> {
    let loan = state.services.loans.borrow(&current.principal, book_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(BorrowResponse {
            message: format!("Book borrowed, due back on {}", loan.due_date),
            loan,
        }),
    ))
}

/// List all loans
#[utoipa::path(
    get,
    path = "/emprestimos",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All loans", body = Vec<Loan>),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_loans(
    State(state): State<AppState>,
    _current: AuthenticatedPrincipal,
) -> AppResult<Json<Vec<Loan>>> {
    let loans = state.services.loans.list().await?;
    Ok(Json(loans))
}
