//! SeaORM implementation of AuthorRepository

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

use crate::domain::{AuthorRepository, DomainError};
use crate::models::author::{self, Entity as AuthorEntity};
use crate::models::book_authors::books_for_author;
use crate::models::{Author, Book};

/// SeaORM-based implementation of AuthorRepository
pub struct SeaOrmAuthorRepository {
    db: DatabaseConnection,
}

impl SeaOrmAuthorRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn to_dto(&self, model: author::Model) -> Result<Author, DomainError> {
        let books = books_for_author(&self.db, model.id).await?;
        let mut dto = Author::from(model);
        dto.books = Some(books.into_iter().map(Book::from).collect());
        Ok(dto)
    }
}

#[async_trait]
impl AuthorRepository for SeaOrmAuthorRepository {
    async fn find_all(&self) -> Result<Vec<Author>, DomainError> {
        let authors = AuthorEntity::find()
            .order_by_asc(author::Column::Id)
            .all(&self.db)
            .await?;

        let mut dtos = Vec::with_capacity(authors.len());
        for model in authors {
            dtos.push(self.to_dto(model).await?);
        }
        Ok(dtos)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Author>, DomainError> {
        match AuthorEntity::find_by_id(id).one(&self.db).await? {
            Some(model) => Ok(Some(self.to_dto(model).await?)),
            None => Ok(None),
        }
    }
}
