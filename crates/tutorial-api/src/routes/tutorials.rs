//! # Tutorials API
//!
//! CRUD and search over the single `Tutorial` resource. Every handler
//! validates its input and then performs exactly one repository call.
//!
//! ## Endpoints
//!
//! - `POST /api/tutorials` — create tutorial
//! - `GET /api/tutorials` — list tutorials (optional `?title=` substring filter)
//! - `GET /api/tutorials/published` — list published tutorials
//! - `GET /api/tutorials/{id}` — get tutorial
//! - `PUT /api/tutorials/{id}` — update tutorial
//! - `DELETE /api/tutorials/{id}` — delete tutorial
//! - `DELETE /api/tutorials` — delete all tutorials

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tutorial_core::{NewTutorial, TitleFilter, Tutorial, TutorialPatch};
use utoipa::{IntoParams, ToSchema};

use crate::error::AppError;
use crate::extractors::{extract_query, extract_validated_json, parse_tutorial_id};
use crate::state::AppState;

// ── Request/Response DTOs ───────────────────────────────────────────

/// Query parameters for listing tutorials.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListTutorialsQuery {
    /// Case-insensitive substring the title must contain.
    pub title: Option<String>,
}

/// Outcome of an update or delete.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MutationResponse {
    /// Human-readable summary.
    pub message: String,
    /// Number of tutorials affected.
    pub count: u64,
}

// ── Router ──────────────────────────────────────────────────────────

/// Build the tutorials router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/tutorials",
            get(list_tutorials)
                .post(create_tutorial)
                .delete(delete_all_tutorials),
        )
        .route("/api/tutorials/published", get(list_published))
        .route(
            "/api/tutorials/{id}",
            get(get_tutorial)
                .put(update_tutorial)
                .delete(delete_tutorial),
        )
}

// ── Handlers ────────────────────────────────────────────────────────

/// POST /api/tutorials — Create a new tutorial.
#[utoipa::path(
    post,
    path = "/api/tutorials",
    request_body = NewTutorial,
    responses(
        (status = 201, description = "Tutorial created", body = Tutorial),
        (status = 400, description = "Missing title or malformed body", body = crate::error::ErrorBody),
    ),
    tag = "tutorials"
)]
pub async fn create_tutorial(
    State(state): State<AppState>,
    body: Result<Json<NewTutorial>, JsonRejection>,
) -> Result<(StatusCode, Json<Tutorial>), AppError> {
    let req = extract_validated_json(body)?;
    let record = req.into_tutorial(Utc::now())?;

    state.tutorials.insert(&record).await?;

    tracing::info!(tutorial_id = %record.id, "tutorial created");
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /api/tutorials — List tutorials, optionally filtered by title.
#[utoipa::path(
    get,
    path = "/api/tutorials",
    params(ListTutorialsQuery),
    responses(
        (status = 200, description = "Tutorials in creation order", body = Vec<Tutorial>),
        (status = 400, description = "Malformed query string", body = crate::error::ErrorBody),
    ),
    tag = "tutorials"
)]
pub async fn list_tutorials(
    State(state): State<AppState>,
    query: Result<Query<ListTutorialsQuery>, QueryRejection>,
) -> Result<Json<Vec<Tutorial>>, AppError> {
    let query = extract_query(query)?;
    let filter = TitleFilter::new(query.title.as_deref());
    Ok(Json(state.tutorials.list(&filter).await?))
}

/// GET /api/tutorials/published — List published tutorials.
#[utoipa::path(
    get,
    path = "/api/tutorials/published",
    responses(
        (status = 200, description = "Published tutorials in creation order", body = Vec<Tutorial>),
    ),
    tag = "tutorials"
)]
pub async fn list_published(
    State(state): State<AppState>,
) -> Result<Json<Vec<Tutorial>>, AppError> {
    Ok(Json(state.tutorials.list_published().await?))
}

/// GET /api/tutorials/{id} — Get a single tutorial.
#[utoipa::path(
    get,
    path = "/api/tutorials/{id}",
    params(("id" = String, Path, description = "Tutorial ID")),
    responses(
        (status = 200, description = "Tutorial found", body = Tutorial),
        (status = 404, description = "Tutorial not found", body = crate::error::ErrorBody),
    ),
    tag = "tutorials"
)]
pub async fn get_tutorial(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Tutorial>, AppError> {
    let id = parse_tutorial_id(&id)?;
    state
        .tutorials
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::tutorial_not_found(id))
}

/// PUT /api/tutorials/{id} — Update a tutorial's fields.
#[utoipa::path(
    put,
    path = "/api/tutorials/{id}",
    params(("id" = String, Path, description = "Tutorial ID")),
    request_body = TutorialPatch,
    responses(
        (status = 200, description = "Tutorial updated", body = MutationResponse),
        (status = 400, description = "Blank title or malformed body", body = crate::error::ErrorBody),
        (status = 404, description = "Tutorial not found", body = crate::error::ErrorBody),
    ),
    tag = "tutorials"
)]
pub async fn update_tutorial(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<TutorialPatch>, JsonRejection>,
) -> Result<Json<MutationResponse>, AppError> {
    let id = parse_tutorial_id(&id)?;
    let patch = extract_validated_json(body)?;

    state
        .tutorials
        .update(&id, &patch, Utc::now())
        .await?
        .ok_or_else(|| AppError::tutorial_not_found(id))?;

    tracing::info!(tutorial_id = %id, "tutorial updated");
    Ok(Json(MutationResponse {
        message: "Tutorial was updated successfully.".to_string(),
        count: 1,
    }))
}

/// DELETE /api/tutorials/{id} — Delete a tutorial.
#[utoipa::path(
    delete,
    path = "/api/tutorials/{id}",
    params(("id" = String, Path, description = "Tutorial ID")),
    responses(
        (status = 200, description = "Tutorial deleted", body = MutationResponse),
        (status = 404, description = "Tutorial not found", body = crate::error::ErrorBody),
    ),
    tag = "tutorials"
)]
pub async fn delete_tutorial(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MutationResponse>, AppError> {
    let id = parse_tutorial_id(&id)?;
    if !state.tutorials.delete(&id).await? {
        return Err(AppError::tutorial_not_found(id));
    }

    tracing::info!(tutorial_id = %id, "tutorial deleted");
    Ok(Json(MutationResponse {
        message: "Tutorial was deleted successfully!".to_string(),
        count: 1,
    }))
}

/// DELETE /api/tutorials — Delete every tutorial.
#[utoipa::path(
    delete,
    path = "/api/tutorials",
    responses(
        (status = 200, description = "All tutorials deleted", body = MutationResponse),
    ),
    tag = "tutorials"
)]
pub async fn delete_all_tutorials(
    State(state): State<AppState>,
) -> Result<Json<MutationResponse>, AppError> {
    let removed = state.tutorials.delete_all().await?;

    tracing::info!(count = removed, "all tutorials deleted");
    Ok(Json(MutationResponse {
        message: format!("{removed} Tutorials were deleted successfully!"),
        count: removed,
    }))
}
