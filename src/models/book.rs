use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::author::{Author, AuthorRef};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    /// Filename inside the images directory
    pub image: String,
    pub published_at: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::book_authors::Entity")]
    BookAuthors,
}

impl Related<super::book_authors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BookAuthors.def()
    }
}

impl Related<super::author::Entity> for Entity {
    fn to() -> RelationDef {
        super::book_authors::Relation::Author.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::book_authors::Relation::Book.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

// DTO for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<Author>>,
    pub published_at: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Model> for Book {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            image: model.image,
            authors: None,
            published_at: model.published_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl Book {
    pub fn with_authors(mut self, authors: Vec<Author>) -> Self {
        self.authors = Some(authors);
        self
    }
}

/// Inbound payload for create and update requests.
///
/// Every field is optional at parse time so that missing values surface as
/// validation violations rather than as deserialization failures. Server
/// assigned fields (`id`, timestamps) are ignored if sent.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct BookInput {
    pub title: Option<String>,
    pub description: Option<String>,
    /// `data:image/<png|jpeg|jpg>;base64,...` or, on update, the current filename
    pub image: Option<String>,
    pub authors: Option<Vec<AuthorRef>>,
    /// RFC 3339 date-time, naive date-time or date
    pub published_at: Option<String>,
}
