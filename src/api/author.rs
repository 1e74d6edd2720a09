use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::error::ApiError;
use crate::infrastructure::AppState;
use crate::models::Author;

#[utoipa::path(
    get,
    path = "/api/authors",
    responses(
        (status = 200, description = "All authors with their books", body = [Author])
    )
)]
pub async fn list_authors(State(state): State<AppState>) -> Result<Json<Vec<Author>>, ApiError> {
    let authors = state.author_repo.find_all().await?;
    Ok(Json(authors))
}

#[utoipa::path(
    get,
    path = "/api/authors/{id}",
    params(("id" = i32, Path, description = "Author id")),
    responses(
        (status = 200, description = "The author with their books", body = Author),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    let response = match state.author_repo.find_by_id(id).await? {
        Some(author) => (StatusCode::OK, Json(author)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Author not found" })),
        )
            .into_response(),
    };
    Ok(response)
}
