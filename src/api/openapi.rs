//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Book Club API",
        version = "0.1.0",
        description = "Reading club catalog REST API",
        license(name = "MIT")
    ),
    servers(
        (url = "/v1", description = "API v1")
    ),
    paths(
        health::health_check,
        health::readiness_check,
        books::create_book,
        books::list_books,
        books::update_book,
        books::delete_book,
    ),
    components(
        schemas(
            health::HealthResponse,
            crate::models::Book,
            crate::models::BookStatus,
            crate::models::book::CreateBookRequest,
            crate::models::book::UpdateBookRequest,
        )
    ),
    tags(
        (name = "books", description = "Reading club catalog"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

/// Create the Swagger UI router serving the OpenAPI document
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
