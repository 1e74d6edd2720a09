use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

use super::error::ApiError;
use crate::domain::BookFilter;
use crate::infrastructure::AppState;
use crate::models::{Book, BookInput};
use crate::services::ServiceError;
use crate::services::book_service;

#[derive(Debug, Deserialize)]
pub struct BooksQuery {
    pub title: Option<String>,
    pub author: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[utoipa::path(
    get,
    path = "/api/books",
    params(
        ("title" = Option<String>, Query, description = "Title substring"),
        ("author" = Option<String>, Query, description = "Author name or surname substring"),
        ("page" = Option<u64>, Query, description = "Zero-based page, used with limit"),
        ("limit" = Option<u64>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Books with their authors")
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    Query(params): Query<BooksQuery>,
) -> Result<Json<Value>, ApiError> {
    let filter = BookFilter {
        title: params.title,
        author: params.author,
        page: params.page,
        limit: params.limit,
    };

    let result = state.book_repo.find_all(filter).await?;

    Ok(Json(json!({
        "books": result.books,
        "total": result.total
    })))
}

#[utoipa::path(
    get,
    path = "/api/books/{id}",
    params(("id" = i32, Path, description = "Book id")),
    responses(
        (status = 200, description = "The book", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Book>, ApiError> {
    match state.book_repo.find_by_id(id).await? {
        Some(book) => Ok(Json(book)),
        None => Err(ServiceError::NotFound.into()),
    }
}

#[utoipa::path(
    post,
    path = "/api/books",
    request_body = BookInput,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Malformed body or image"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    payload: Result<Json<BookInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), ApiError> {
    let Json(input) = payload?;

    let book = book_service::create_book(state.db(), state.images.as_ref(), input).await?;

    Ok((StatusCode::CREATED, Json(book)))
}

#[utoipa::path(
    put,
    path = "/api/books/{id}",
    params(("id" = i32, Path, description = "Book id")),
    request_body = BookInput,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Malformed body or image"),
        (status = 404, description = "Book not found"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    payload: Result<Json<BookInput>, JsonRejection>,
) -> Result<Json<Book>, ApiError> {
    // An unknown id wins over a bad body
    let existing = book_service::find_book(state.db(), id).await?;
    let Json(input) = payload?;

    let book =
        book_service::update_book(state.db(), state.images.as_ref(), existing, input).await?;

    Ok(Json(book))
}

#[utoipa::path(
    delete,
    path = "/api/books/{id}",
    params(("id" = i32, Path, description = "Book id")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    book_service::delete_book(state.book_repo.as_ref(), state.images.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
