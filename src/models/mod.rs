pub mod author;
pub mod book;
pub mod book_authors;

pub use author::{Author, AuthorRef};
pub use book::{Book, BookInput};
