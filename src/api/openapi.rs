//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, health, loans, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Schoolib API",
        version = "0.1.0",
        description = "School Library Management System API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login_status,
        auth::login,
        auth::logout,
        auth::register,
        auth::me,
        // Books
        books::index,
        books::list_books,
        books::get_book,
        // Loans
        loans::borrow_book,
        loans::list_loans,
        // Users
        users::list_students,
        users::list_teachers,
        users::list_librarians,
        users::list_directors,
        users::list_supervisors,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::LoginStatus,
            auth::MessageResponse,
            crate::models::principal::NewAccount,
            // Principals
            crate::models::principal::Principal,
            crate::models::principal::PrincipalKind,
            crate::models::principal::Profile,
            // Books
            crate::models::book::Book,
            // Loans
            loans::BorrowResponse,
            crate::models::loan::Loan,
            crate::models::loan::LoanStatus,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Login, logout and student registration"),
        (name = "books", description = "Catalog"),
        (name = "loans", description = "Loan management"),
        (name = "users", description = "Role listings")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
