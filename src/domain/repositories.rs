//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;

use super::DomainError;
use crate::models::{Author, Book};

/// Filter criteria for book queries
#[derive(Debug, Default, Clone)]
pub struct BookFilter {
    pub title: Option<String>,
    pub author: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// Paginated result with total count
#[derive(Debug)]
pub struct PaginatedBooks {
    pub books: Vec<Book>,
    pub total: u64,
}

/// Repository trait for Author entity
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    /// Find all authors, each with the books they appear on
    async fn find_all(&self) -> Result<Vec<Author>, DomainError>;

    /// Find an author by ID, with the books they appear on
    async fn find_by_id(&self, id: i32) -> Result<Option<Author>, DomainError>;
}

/// Repository trait for Book entity
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Find all books matching the filter criteria with pagination support
    async fn find_all(&self, filter: BookFilter) -> Result<PaginatedBooks, DomainError>;

    /// Find a single book by ID, authors included
    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, DomainError>;

    /// Delete a book and its author links, returning the image filename it held
    async fn delete(&self, id: i32) -> Result<String, DomainError>;
}

/// Storage for decoded book images
#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Write the bytes under a freshly generated name and return that name
    async fn store(&self, bytes: &[u8], extension: &str) -> Result<String, DomainError>;

    /// Remove a stored image. Removing a file that is already gone is not an error.
    async fn remove(&self, filename: &str) -> Result<(), DomainError>;

    async fn exists(&self, filename: &str) -> bool;
}
