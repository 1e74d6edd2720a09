use sea_orm::entity::prelude::*;
use sea_orm::QueryOrder;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "book_authors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub book_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub author_id: i32,
    /// Order in which the author was supplied for this book
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::book::Entity",
        from = "Column::BookId",
        to = "super::book::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Book,
    #[sea_orm(
        belongs_to = "super::author::Entity",
        from = "Column::AuthorId",
        to = "super::author::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Author,
}

impl Related<super::book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Book.def()
    }
}

impl Related<super::author::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Authors linked to a book, in the order they were supplied
pub async fn authors_for_book<C: ConnectionTrait>(
    db: &C,
    book_id: i32,
) -> Result<Vec<super::author::Model>, DbErr> {
    let rows = Entity::find()
        .filter(Column::BookId.eq(book_id))
        .order_by_asc(Column::Position)
        .find_also_related(super::author::Entity)
        .all(db)
        .await?;

    Ok(rows.into_iter().filter_map(|(_, author)| author).collect())
}

/// Books an author appears on, oldest first
pub async fn books_for_author<C: ConnectionTrait>(
    db: &C,
    author_id: i32,
) -> Result<Vec<super::book::Model>, DbErr> {
    let rows = Entity::find()
        .filter(Column::AuthorId.eq(author_id))
        .order_by_asc(Column::BookId)
        .find_also_related(super::book::Entity)
        .all(db)
        .await?;

    Ok(rows.into_iter().filter_map(|(_, book)| book).collect())
}
