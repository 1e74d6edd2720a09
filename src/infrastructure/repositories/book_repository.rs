//! SeaORM implementation of BookRepository

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};

use crate::domain::{BookFilter, BookRepository, DomainError, PaginatedBooks};
use crate::models::book::{Column, Entity as BookEntity, Model};
use crate::models::book_authors::{self, authors_for_book};
use crate::models::{Author, Book, author};

/// SeaORM-based implementation of BookRepository
pub struct SeaOrmBookRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn to_dto(&self, model: Model) -> Result<Book, DomainError> {
        let authors = authors_for_book(&self.db, model.id).await?;
        Ok(Book::from(model).with_authors(authors.into_iter().map(Author::from).collect()))
    }

    /// Ids of books with an author whose name or surname contains `needle`
    async fn book_ids_by_author(&self, needle: &str) -> Result<Vec<i32>, DomainError> {
        let rows = book_authors::Entity::find()
            .find_also_related(author::Entity)
            .filter(
                Condition::any()
                    .add(author::Column::Name.contains(needle))
                    .add(author::Column::Surname.contains(needle)),
            )
            .all(&self.db)
            .await?;

        let mut ids: Vec<i32> = rows.into_iter().map(|(link, _)| link.book_id).collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }
}

#[async_trait]
impl BookRepository for SeaOrmBookRepository {
    async fn find_all(&self, filter: BookFilter) -> Result<PaginatedBooks, DomainError> {
        let mut query = BookEntity::find();

        if let Some(title) = &filter.title
            && !title.is_empty()
        {
            query = query.filter(Column::Title.contains(title));
        }

        if let Some(author) = &filter.author
            && !author.is_empty()
        {
            let ids = self.book_ids_by_author(author).await?;
            query = query.filter(Column::Id.is_in(ids));
        }

        query = query.order_by_asc(Column::Id);

        // Fetch with pagination and total count
        let (books, total) = if let Some(limit) = filter.limit {
            let page = filter.page.unwrap_or(0);
            let paginator = query.paginate(&self.db, limit.max(1));
            let total = paginator.num_items().await?;
            let items = paginator.fetch_page(page).await?;
            (items, total)
        } else {
            let items = query.all(&self.db).await?;
            let total = items.len() as u64;
            (items, total)
        };

        let mut book_dtos = Vec::with_capacity(books.len());
        for book_model in books {
            book_dtos.push(self.to_dto(book_model).await?);
        }

        Ok(PaginatedBooks {
            books: book_dtos,
            total,
        })
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, DomainError> {
        match BookEntity::find_by_id(id).one(&self.db).await? {
            Some(model) => Ok(Some(self.to_dto(model).await?)),
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i32) -> Result<String, DomainError> {
        let txn = self.db.begin().await?;

        let book = BookEntity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(DomainError::NotFound)?;

        book_authors::Entity::delete_many()
            .filter(book_authors::Column::BookId.eq(id))
            .exec(&txn)
            .await?;
        BookEntity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(book.image)
    }
}
