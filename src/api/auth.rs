//! Authentication endpoints: login, logout, registration

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult, LOGIN_PATH},
    models::principal::{NewAccount, Principal},
    AppState,
};

use super::AuthenticatedPrincipal;

/// Login request
#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub principal: Principal,
}

/// Whether the caller already holds a session
#[derive(Serialize, ToSchema)]
pub struct LoginStatus {
    pub authenticated: bool,
    pub principal: Option<Principal>,
}

/// Plain outcome message with an optional next location
#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

/// Login entry point
#[utoipa::path(
    get,
    path = "/login",
    tag = "auth",
    responses(
        (status = 200, description = "Current login status", body = LoginStatus),
        (status = 500, description = "Session lookup failed", body = crate::error::ErrorResponse)
    )
)]
pub async fn login_status(
    current: Result<AuthenticatedPrincipal, AppError>,
) -> AppResult<Json<LoginStatus>> {
    let principal = match current {
        Ok(current) => Some(current.principal),
        Err(AppError::Unauthenticated) => None,
        Err(e) => return Err(e),
    };

    Ok(Json(LoginStatus {
        authenticated: principal.is_some(),
        principal,
    }))
}

/// Authenticate with email and password
#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session established", body = LoginResponse),
        (status = 401, description = "Invalid email or password", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> AppResult<(CookieJar, Json<LoginResponse>)> {
    let outcome = state
        .services
        .auth
        .login(&request.email, &request.password)
        .await?;

    let cookie = Cookie::build((state.config.auth.cookie_name.clone(), outcome.token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            token: outcome.token,
            token_type: "Bearer".to_string(),
            expires_at: outcome.session.expires_at,
            principal: outcome.principal,
        }),
    ))
}

/// Close the current session
#[utoipa::path(
    get,
    path = "/logout",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Session closed", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    current: AuthenticatedPrincipal,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<MessageResponse>)> {
    state.services.auth.logout(&current.session).await?;

    let removal = Cookie::build((state.config.auth.cookie_name.clone(), "")).path("/");

    Ok((
        jar.remove(removal),
        Json(MessageResponse {
            message: "Logged out".to_string(),
            redirect: Some(LOGIN_PATH.to_string()),
        }),
    ))
}

/// Student self-registration. Does not open a session.
#[utoipa::path(
    post,
    path = "/cadastro",
    tag = "auth",
    request_body = NewAccount,
    responses(
        (status = 201, description = "Student registered", body = Principal),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 409, description = "Email already registered", body = crate::error::ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<NewAccount>,
) -> AppResult<(StatusCode, Json<Principal>)> {
    let student = state.services.auth.register(request).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

/// Get the authenticated principal
#[utoipa::path(
    get,
    path = "/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current principal", body = Principal),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn me(current: AuthenticatedPrincipal) -> Json<Principal> {
    Json(current.principal)
}
