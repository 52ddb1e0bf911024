//! # OpenAPI Specification Assembly
//!
//! Assembles the utoipa-documented routes into a single OpenAPI 3.1 spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tutorials API",
        version = "0.1.0",
        description = "Create, read, update, delete, and search tutorials.",
        license(name = "MIT")
    ),
    paths(
        crate::routes::tutorials::create_tutorial,
        crate::routes::tutorials::list_tutorials,
        crate::routes::tutorials::list_published,
        crate::routes::tutorials::get_tutorial,
        crate::routes::tutorials::update_tutorial,
        crate::routes::tutorials::delete_tutorial,
        crate::routes::tutorials::delete_all_tutorials,
    ),
    components(schemas(
        tutorial_core::Tutorial,
        tutorial_core::TutorialId,
        tutorial_core::NewTutorial,
        tutorial_core::TutorialPatch,
        crate::routes::tutorials::MutationResponse,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "tutorials", description = "Tutorial CRUD and search"),
    )
)]
pub struct ApiDoc;

/// Router serving the OpenAPI document.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
