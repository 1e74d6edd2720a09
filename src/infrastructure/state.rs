//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::{AuthorRepository, BookRepository, ImageStorage};
use crate::infrastructure::{FsImageStorage, SeaOrmAuthorRepository, SeaOrmBookRepository};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool; each write request opens its own transaction on it
    db: DatabaseConnection,
    /// Book repository
    pub book_repo: Arc<dyn BookRepository>,
    /// Author repository
    pub author_repo: Arc<dyn AuthorRepository>,
    /// Where decoded book images are written
    pub images: Arc<dyn ImageStorage>,
}

impl AppState {
    /// Create a new AppState with all repositories initialized
    pub fn new(db: DatabaseConnection, images_directory: impl Into<PathBuf>) -> Self {
        let images = Arc::new(FsImageStorage::new(images_directory));
        Self::with_storage(db, images)
    }

    /// Create an AppState around a custom image storage
    pub fn with_storage(db: DatabaseConnection, images: Arc<dyn ImageStorage>) -> Self {
        let book_repo = Arc::new(SeaOrmBookRepository::new(db.clone()));
        let author_repo = Arc::new(SeaOrmAuthorRepository::new(db.clone()));

        Self {
            db,
            book_repo,
            author_repo,
            images,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

// Implement FromRef to allow extracting DatabaseConnection from AppState
impl axum::extract::FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}
