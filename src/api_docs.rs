use crate::api;
use crate::models;
use crate::services::validation::FieldViolation;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::books::list_books,
        api::books::get_book,
        api::books::create_book,
        api::books::update_book,
        api::books::delete_book,
        api::author::list_authors,
        api::author::get_author,
    ),
    components(
        schemas(
            models::book::Book,
            models::book::BookInput,
            models::author::Author,
            models::author::AuthorRef,
            FieldViolation,
        )
    ),
    tags(
        (name = "book-catalog", description = "Book catalog API")
    )
)]
pub struct ApiDoc;
