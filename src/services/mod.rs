//! Services Layer
//!
//! This module contains pure business logic extracted from HTTP handlers.

pub mod author_resolver;
pub mod book_service;
pub mod image_codec;
pub mod validation;

// Re-export for convenience
pub use book_service::ServiceError;
pub use image_codec::ImageError;
pub use validation::FieldViolation;
