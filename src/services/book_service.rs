//! Book Service - Pure business logic without HTTP layer
//!
//! Create and update run inside one database transaction per request. The
//! sequence is the same for both: decode the inline image, resolve authors,
//! validate, and only then touch the image directory and commit. A rejected
//! request therefore leaves no rows, no new file, and the previous image in
//! place.
#![allow(clippy::needless_update)] // SeaORM ActiveModels require ..Default::default()

use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, Set,
    TransactionTrait,
};
use thiserror::Error;

use super::author_resolver::{attach_authors, resolve_authors};
use super::image_codec::{self, DecodedImage, ImageError};
use super::validation::{BookDraft, FieldViolation, parse_published_at, validate_book};
use crate::domain::{BookRepository, DomainError, ImageStorage};
use crate::models::book::{ActiveModel as BookActiveModel, Entity as BookEntity, Model};
use crate::models::{Author, Book, BookInput, author};

/// Error type for service operations
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Book not found")]
    NotFound,
    #[error("Validation failed")]
    Validation(Vec<FieldViolation>),
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<DbErr> for ServiceError {
    fn from(e: DbErr) -> Self {
        ServiceError::Database(e.to_string())
    }
}

impl From<DomainError> for ServiceError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::NotFound => ServiceError::NotFound,
            DomainError::Database(msg) => ServiceError::Database(msg),
            DomainError::Storage(msg) => ServiceError::Storage(msg),
        }
    }
}

/// Validated book fields ready to be written
struct BookFields {
    title: String,
    description: Option<String>,
    published_at: String,
}

/// Image value supplied in the payload, if any non-blank one was sent
fn supplied_image(input: &BookInput) -> Option<&str> {
    input
        .image
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Resolve authors and validate the payload on `txn`.
///
/// On any violation the transaction is rolled back, undoing authors created
/// while resolving.
async fn resolve_and_validate(
    txn: DatabaseTransaction,
    input: &BookInput,
) -> Result<(DatabaseTransaction, BookFields, Vec<author::Model>), ServiceError> {
    let refs = input.authors.as_deref().unwrap_or_default();
    let resolved = resolve_authors(&txn, refs).await?;
    if resolved.created > 0 {
        tracing::info!("Created {} new author(s) while resolving refs", resolved.created);
    }

    let mut violations = validate_book(&BookDraft {
        title: input.title.as_deref(),
        image: supplied_image(input),
        author_count: resolved.authors.len(),
        published_at: input.published_at.as_deref(),
    });
    violations.extend(resolved.violations);

    let published_at = input.published_at.as_deref().and_then(parse_published_at);

    match (input.title.clone(), published_at) {
        (Some(title), Some(published_at)) if violations.is_empty() => Ok((
            txn,
            BookFields {
                title,
                description: input.description.clone(),
                published_at: published_at.to_rfc3339(),
            },
            resolved.authors,
        )),
        _ => {
            txn.rollback().await?;
            tracing::info!("Book payload rejected with {} violation(s)", violations.len());
            Err(ServiceError::Validation(violations))
        }
    }
}

/// Best-effort removal of a file written for a request that did not commit
async fn discard_image(images: &dyn ImageStorage, filename: &str) {
    if let Err(e) = images.remove(filename).await {
        tracing::error!("Failed to remove orphaned image {}: {}", filename, e);
    }
}

fn to_dto(model: Model, authors: Vec<author::Model>) -> Book {
    Book::from(model).with_authors(authors.into_iter().map(Author::from).collect())
}

/// Look up the stored row of a book
pub async fn find_book(db: &DatabaseConnection, id: i32) -> Result<Model, ServiceError> {
    BookEntity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound)
}

/// Create a new book from a payload
pub async fn create_book(
    db: &DatabaseConnection,
    images: &dyn ImageStorage,
    input: BookInput,
) -> Result<Book, ServiceError> {
    let decoded: Option<DecodedImage> = supplied_image(&input)
        .map(image_codec::decode)
        .transpose()?;

    let txn = db.begin().await?;
    let (txn, fields, authors) = resolve_and_validate(txn, &input).await?;

    // Validation guarantees a non-blank image, which decoded above
    let Some(decoded) = decoded else {
        txn.rollback().await?;
        return Err(ServiceError::Image(ImageError::MalformedInput(
            "missing image".to_string(),
        )));
    };

    let filename = images.store(&decoded.bytes, &decoded.extension).await?;

    match insert_book(txn, fields, &filename, &authors).await {
        Ok(model) => {
            tracing::info!(
                "Created book {} with {} author(s), image {}",
                model.id,
                authors.len(),
                filename
            );
            Ok(to_dto(model, authors))
        }
        Err(e) => {
            discard_image(images, &filename).await;
            Err(e.into())
        }
    }
}

async fn insert_book(
    txn: DatabaseTransaction,
    fields: BookFields,
    filename: &str,
    authors: &[author::Model],
) -> Result<Model, DbErr> {
    let now = chrono::Utc::now().to_rfc3339();

    let new_book = BookActiveModel {
        title: Set(fields.title),
        description: Set(fields.description),
        image: Set(filename.to_string()),
        published_at: Set(fields.published_at),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = new_book.insert(&txn).await?;
    attach_authors(&txn, model.id, authors, false).await?;
    txn.commit().await?;

    Ok(model)
}

/// Update an existing book from a payload
///
/// The author association is replaced as a whole. When the payload carries an
/// image different from the stored filename it must be a data URI; the new
/// file is written before commit and the previous one removed after.
pub async fn update_book(
    db: &DatabaseConnection,
    images: &dyn ImageStorage,
    existing: Model,
    input: BookInput,
) -> Result<Book, ServiceError> {
    let decoded: Option<DecodedImage> = match supplied_image(&input) {
        Some(value) if value == existing.image => None,
        Some(value) if image_codec::is_data_uri(value) => Some(image_codec::decode(value)?),
        Some(value) => {
            return Err(ImageError::MalformedInput(format!(
                "'{}' is neither the stored image nor a data URI",
                value
            ))
            .into());
        }
        None => None,
    };

    let txn = db.begin().await?;
    let (txn, fields, authors) = resolve_and_validate(txn, &input).await?;

    let new_filename = match &decoded {
        Some(decoded) => Some(images.store(&decoded.bytes, &decoded.extension).await?),
        None => None,
    };
    let old_filename = existing.image.clone();

    match apply_update(txn, existing, fields, new_filename.as_deref(), &authors).await {
        Ok(model) => {
            if let Some(new_filename) = &new_filename {
                // The row already points at the new file; a leftover old file is only clutter
                if let Err(e) = images.remove(&old_filename).await {
                    tracing::warn!("Could not remove replaced image {}: {}", old_filename, e);
                }
                tracing::info!(
                    "Book {} image replaced: {} -> {}",
                    model.id,
                    old_filename,
                    new_filename
                );
            }
            tracing::info!("Updated book {} with {} author(s)", model.id, authors.len());
            Ok(to_dto(model, authors))
        }
        Err(e) => {
            if let Some(new_filename) = &new_filename {
                discard_image(images, new_filename).await;
            }
            Err(e.into())
        }
    }
}

async fn apply_update(
    txn: DatabaseTransaction,
    existing: Model,
    fields: BookFields,
    new_filename: Option<&str>,
    authors: &[author::Model],
) -> Result<Model, DbErr> {
    let book_id = existing.id;
    let mut book: BookActiveModel = existing.into();

    book.title = Set(fields.title);
    book.description = Set(fields.description);
    book.published_at = Set(fields.published_at);
    if let Some(filename) = new_filename {
        book.image = Set(filename.to_string());
    }
    book.updated_at = Set(chrono::Utc::now().to_rfc3339());

    let model = book.update(&txn).await?;
    attach_authors(&txn, book_id, authors, true).await?;
    txn.commit().await?;

    Ok(model)
}

/// Delete a book, then its image file
pub async fn delete_book(
    books: &dyn BookRepository,
    images: &dyn ImageStorage,
    id: i32,
) -> Result<(), ServiceError> {
    let image = books.delete(id).await?;

    if let Err(e) = images.remove(&image).await {
        tracing::warn!("Book {} deleted but image {} remains: {}", id, image, e);
    }

    tracing::info!("Deleted book {}", id);
    Ok(())
}
