pub mod author;
pub mod books;
pub mod error;
pub mod health;

use axum::{Router, extract::DefaultBodyLimit, routing::get};

use crate::infrastructure::AppState;

pub use error::ApiError;

/// Request body ceiling; a 2 MiB image grows by a third once base64 encoded
pub const MAX_REQUEST_BYTES: usize = 4 * 1024 * 1024;

pub fn api_router_with_state(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Books
        .route(
            "/books",
            get(books::list_books)
                .post(books::create_book)
                .fallback(error::method_not_allowed),
        )
        .route(
            "/books/:id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book)
                .fallback(error::method_not_allowed),
        )
        // Authors
        .route("/authors", get(author::list_authors))
        .route("/authors/:id", get(author::get_author))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES))
        .with_state(state)
}
