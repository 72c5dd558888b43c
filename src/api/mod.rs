//! API handlers for Schoolib endpoints

pub mod auth;
pub mod books;
pub mod health;
pub mod loans;
pub mod openapi;
pub mod users;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    routing::{get, post},
    RequestPartsExt, Router,
};
use axum_extra::{
    extract::CookieJar,
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    error::AppError,
    models::{principal::Principal, session::Session},
    AppState,
};

/// Access guard: extracting this rejects any request without a live
/// session with `Unauthenticated`, and hands the resolved principal to
/// the handler otherwise.
pub struct AuthenticatedPrincipal {
    pub session: Session,
    pub principal: Principal,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedPrincipal {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = session_token(parts, &state.config.auth.cookie_name)
            .await
            .ok_or(AppError::Unauthenticated)?;

        let (session, principal) = state.services.auth.authenticate(&token).await?;

        Ok(AuthenticatedPrincipal { session, principal })
    }
}

/// Session token from the `Authorization: Bearer` header, else the session cookie
async fn session_token(parts: &mut Parts, cookie_name: &str) -> Option<String> {
    if let Ok(TypedHeader(Authorization(bearer))) =
        parts.extract::<TypedHeader<Authorization<Bearer>>>().await
    {
        return Some(bearer.token().to_string());
    }

    CookieJar::from_headers(&parts.headers)
        .get(cookie_name)
        .map(|cookie| cookie.value().to_string())
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .route("/login", get(auth::login_status).post(auth::login))
        .route("/cadastro", post(auth::register))
        .route("/logout", get(auth::logout))
        .route("/me", get(auth::me))
        // Catalog
        .route("/", get(books::index))
        .route("/livros", get(books::list_books))
        .route("/livros/:id", get(books::get_book))
        // Loans
        .route("/emprestar/:book_id", get(loans::borrow_book))
        .route("/emprestimos", get(loans::list_loans))
        // Role listings
        .route("/alunos", get(users::list_students))
        .route("/professores", get(users::list_teachers))
        .route("/bibliotecarios", get(users::list_librarians))
        .route("/diretores", get(users::list_directors))
        .route("/supervisores", get(users::list_supervisors))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
