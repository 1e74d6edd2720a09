//! Author resolution for book payloads
//!
//! Turns the `authors` list of a book payload into author rows: references by
//! id must exist, references by name are matched on (name, surname,
//! patronymic) and created when no match exists. All work happens on the
//! connection handed in, normally the request transaction, so authors created
//! for a request that is later rejected are rolled back with it.
#![allow(clippy::needless_update)] // SeaORM ActiveModels require ..Default::default()

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set,
};

use super::validation::{self, FieldViolation};
use crate::models::AuthorRef;
use crate::models::author::{self, ActiveModel as AuthorActive, Entity as AuthorEntity};
use crate::models::book_authors::{self, ActiveModel as BookAuthorActive};

/// Outcome of resolving one payload's author list
#[derive(Debug, Default)]
pub struct ResolvedAuthors {
    /// Distinct authors in first-seen order
    pub authors: Vec<author::Model>,
    /// Number of authors inserted while resolving
    pub created: usize,
    pub violations: Vec<FieldViolation>,
}

impl ResolvedAuthors {
    fn push(&mut self, model: author::Model) {
        if !self.authors.iter().any(|a| a.id == model.id) {
            self.authors.push(model);
        }
    }
}

/// Resolve every reference in input order.
///
/// Unknown ids and invalid name fields become violations; the remaining
/// references are still resolved so that all problems are reported together.
pub async fn resolve_authors<C: ConnectionTrait>(
    db: &C,
    refs: &[AuthorRef],
) -> Result<ResolvedAuthors, DbErr> {
    let mut resolved = ResolvedAuthors::default();

    for (index, author_ref) in refs.iter().enumerate() {
        let prefix = format!("authors[{}]", index);

        if let Some(id) = author_ref.id {
            match AuthorEntity::find_by_id(id).one(db).await? {
                Some(existing) => resolved.push(existing),
                None => resolved.violations.push(FieldViolation::new(
                    format!("{}.id", prefix),
                    "exists",
                    format!("Author {} does not exist", id),
                )),
            }
            continue;
        }

        if author_ref.name.is_none() && author_ref.surname.is_none() {
            resolved.violations.push(FieldViolation::new(
                prefix,
                "reference",
                "An author needs either an id or a name and surname",
            ));
            continue;
        }

        let name = author_ref.name.as_deref().unwrap_or_default().trim();
        let surname = author_ref.surname.as_deref().unwrap_or_default().trim();
        let patronymic = author_ref
            .patronymic
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty());

        let violations = validation::validate_author(&prefix, name, surname);
        if !violations.is_empty() {
            resolved.violations.extend(violations);
            continue;
        }

        match find_by_identity(db, name, surname, patronymic).await? {
            Some(existing) => resolved.push(existing),
            None => {
                let now = chrono::Utc::now().to_rfc3339();
                let new_author = AuthorActive {
                    name: Set(name.to_string()),
                    surname: Set(surname.to_string()),
                    patronymic: Set(patronymic.map(str::to_string)),
                    created_at: Set(now.clone()),
                    updated_at: Set(now),
                    ..Default::default()
                };
                let model = new_author.insert(db).await?;
                tracing::debug!("Created author {} ({} {})", model.id, name, surname);
                resolved.created += 1;
                resolved.push(model);
            }
        }
    }

    Ok(resolved)
}

/// Exact match on the identity triple; an absent patronymic only matches NULL.
async fn find_by_identity<C: ConnectionTrait>(
    db: &C,
    name: &str,
    surname: &str,
    patronymic: Option<&str>,
) -> Result<Option<author::Model>, DbErr> {
    let mut query = AuthorEntity::find()
        .filter(author::Column::Name.eq(name))
        .filter(author::Column::Surname.eq(surname));

    query = match patronymic {
        Some(p) => query.filter(author::Column::Patronymic.eq(p)),
        None => query.filter(author::Column::Patronymic.is_null()),
    };

    query.one(db).await
}

/// Link `authors` to a book.
///
/// With `replace` set, the book's current links are removed first, so the
/// association ends up exactly equal to `authors`.
pub async fn attach_authors<C: ConnectionTrait>(
    db: &C,
    book_id: i32,
    authors: &[author::Model],
    replace: bool,
) -> Result<(), DbErr> {
    if replace {
        book_authors::Entity::delete_many()
            .filter(book_authors::Column::BookId.eq(book_id))
            .exec(db)
            .await?;
    }

    for (position, author) in authors.iter().enumerate() {
        let link = BookAuthorActive {
            book_id: Set(book_id),
            author_id: Set(author.id),
            position: Set(position as i32),
        };
        link.insert(db).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use sea_orm::{DatabaseConnection, PaginatorTrait, TransactionTrait};

    async fn setup_test_db() -> DatabaseConnection {
        init_db("sqlite::memory:").await.expect("Failed to init db")
    }

    fn by_name(name: &str, surname: &str, patronymic: Option<&str>) -> AuthorRef {
        AuthorRef {
            id: None,
            name: Some(name.to_string()),
            surname: Some(surname.to_string()),
            patronymic: patronymic.map(str::to_string),
        }
    }

    fn by_id(id: i32) -> AuthorRef {
        AuthorRef {
            id: Some(id),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_unseen_triple_creates_one_author() {
        let db = setup_test_db().await;

        let resolved = resolve_authors(&db, &[by_name("Leo", "Tolstoy", None)])
            .await
            .unwrap();

        assert!(resolved.violations.is_empty());
        assert_eq!(resolved.created, 1);
        assert_eq!(resolved.authors[0].surname, "Tolstoy");
        assert_eq!(AuthorEntity::find().count(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_known_triple_is_reused() {
        let db = setup_test_db().await;
        let first = resolve_authors(&db, &[by_name("Fyodor", "Dostoevsky", Some("Mikhailovich"))])
            .await
            .unwrap();

        let second = resolve_authors(&db, &[by_name(" Fyodor ", "Dostoevsky", Some("Mikhailovich"))])
            .await
            .unwrap();

        assert_eq!(second.created, 0);
        assert_eq!(second.authors[0].id, first.authors[0].id);
        assert_eq!(AuthorEntity::find().count(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_patronymic_is_part_of_identity() {
        let db = setup_test_db().await;
        resolve_authors(&db, &[by_name("Anton", "Chekhov", None)])
            .await
            .unwrap();

        let resolved = resolve_authors(&db, &[by_name("Anton", "Chekhov", Some("Pavlovich"))])
            .await
            .unwrap();

        assert_eq!(resolved.created, 1);
        assert_eq!(AuthorEntity::find().count(&db).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_blank_patronymic_matches_absent_one() {
        let db = setup_test_db().await;
        resolve_authors(&db, &[by_name("Anton", "Chekhov", None)])
            .await
            .unwrap();

        let resolved = resolve_authors(&db, &[by_name("Anton", "Chekhov", Some("  "))])
            .await
            .unwrap();

        assert_eq!(resolved.created, 0);
        assert_eq!(resolved.authors[0].patronymic, None);
    }

    #[tokio::test]
    async fn test_duplicate_refs_collapse() {
        let db = setup_test_db().await;
        let refs = vec![
            by_name("Ivan", "Turgenev", None),
            by_name("Nikolai", "Gogol", None),
            by_name("Ivan", "Turgenev", None),
        ];

        let resolved = resolve_authors(&db, &refs).await.unwrap();

        assert_eq!(resolved.created, 2);
        let surnames: Vec<&str> = resolved.authors.iter().map(|a| a.surname.as_str()).collect();
        assert_eq!(surnames, vec!["Turgenev", "Gogol"]);

        let by_ids = vec![by_id(resolved.authors[1].id), by_id(resolved.authors[1].id)];
        let again = resolve_authors(&db, &by_ids).await.unwrap();
        assert_eq!(again.authors.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_id_is_a_violation() {
        let db = setup_test_db().await;

        let resolved = resolve_authors(&db, &[by_id(4242), by_name("Leo", "Tolstoy", None)])
            .await
            .unwrap();

        assert_eq!(resolved.violations.len(), 1);
        assert_eq!(resolved.violations[0].field, "authors[0].id");
        assert_eq!(resolved.violations[0].rule, "exists");
        assert_eq!(resolved.authors.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_names_are_not_created() {
        let db = setup_test_db().await;

        let resolved = resolve_authors(
            &db,
            &[by_name("Lu", "Xu", None), AuthorRef::default()],
        )
        .await
        .unwrap();

        let fields: Vec<&str> = resolved.violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["authors[0].surname", "authors[1]"]);
        assert_eq!(AuthorEntity::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_rolled_back_authors_disappear() {
        let db = setup_test_db().await;

        let txn = db.begin().await.unwrap();
        let resolved = resolve_authors(&txn, &[by_name("Leo", "Tolstoy", None)])
            .await
            .unwrap();
        assert_eq!(resolved.created, 1);
        txn.rollback().await.unwrap();

        assert_eq!(AuthorEntity::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_attach_replace_rebuilds_links() {
        let db = setup_test_db().await;
        let now = chrono::Utc::now().to_rfc3339();
        let book = crate::models::book::ActiveModel {
            title: Set("War and Peace".to_string()),
            image: Set("cover.png".to_string()),
            published_at: Set(now.clone()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        let first = resolve_authors(
            &db,
            &[by_name("Leo", "Tolstoy", None), by_name("Nikolai", "Gogol", None)],
        )
        .await
        .unwrap();
        attach_authors(&db, book.id, &first.authors, false)
            .await
            .unwrap();

        let second = resolve_authors(&db, &[by_name("Ivan", "Turgenev", None)])
            .await
            .unwrap();
        attach_authors(&db, book.id, &second.authors, true)
            .await
            .unwrap();
        attach_authors(&db, book.id, &second.authors, true)
            .await
            .unwrap();

        let links = book_authors::Entity::find()
            .filter(book_authors::Column::BookId.eq(book.id))
            .all(&db)
            .await
            .unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].author_id, second.authors[0].id);
    }
}
