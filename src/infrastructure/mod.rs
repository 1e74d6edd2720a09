//! Infrastructure layer - Framework implementations
//!
//! This layer contains:
//! - Database connection and migrations (db)
//! - HTTP server setup (server)
//! - Configuration loading (config)
//! - Repository implementations (repositories)
//! - Image file storage (image_store)
//! - Application state (state)

pub mod config;
pub mod db;
pub mod image_store;
pub mod repositories;
pub mod server;
pub mod state;

pub use image_store::FsImageStorage;
pub use repositories::*;
pub use state::AppState;
