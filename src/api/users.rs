//! Role listing endpoints

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::principal::{Principal, PrincipalKind},
    AppState,
};

use super::AuthenticatedPrincipal;

async fn list(state: &AppState, kind: PrincipalKind) -> AppResult<Json<Vec<Principal>>> {
    let principals = state.services.users.list(kind).await?;
    Ok(Json(principals))
}

/// List students
#[utoipa::path(
    get,
    path = "/alunos",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All students", body = Vec<Principal>),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_students(
    State(state): State<AppState>,
    _current: AuthenticatedPrincipal,
) -> AppResult<Json<Vec<Principal>>> {
    list(&state, PrincipalKind::Student).await
}

/// List teachers
#[utoipa::path(
    get,
    path = "/professores",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All teachers", body = Vec<Principal>),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_teachers(
    State(state): State<AppState>,
    _current: AuthenticatedPrincipal,
) -> AppResult<Json<Vec<Principal>>> {
    list(&state, PrincipalKind::Teacher).await
}

/// List librarians
#[utoipa::path(
    get,
    path = "/bibliotecarios",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All librarians", body = Vec<Principal>),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_librarians(
    State(state): State<AppState>,
    _current: AuthenticatedPrincipal,
) -> AppResult<Json<Vec<Principal>>> {
    list(&state, PrincipalKind::Librarian).await
}

/// List directors
#[utoipa::path(
    get,
    path = "/diretores",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All directors", body = Vec<Principal>),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_directors(
    State(state): State<AppState>,
    _current: AuthenticatedPrincipal,
) -> AppResult<Json<Vec<Principal>>> {
    list(&state, PrincipalKind::Director).await
}

/// List supervisors
#[utoipa::path(
    get,
    path = "/supervisores",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All supervisors", body = Vec<Principal>),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_supervisors(
    State(state): State<AppState>,
    _current: AuthenticatedPrincipal,
) -> AppResult<Json<Vec<Principal>>> {
    list(&state, PrincipalKind::Supervisor).await
}
