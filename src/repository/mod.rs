//! Persistence layer for the book catalog

pub mod books;
pub mod migrations;

use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{Book, BookFilters},
};

pub use books::SqliteBookRepository;

/// Persistence contract for books. The service layer only depends on this
/// trait, so tests can substitute a mock and a different store technology
/// only needs a new implementation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// Insert a book, generating a fresh id when none is set, and return
    /// the stored record.
    async fn create(&self, book: Book) -> AppResult<Book>;

    /// Return every book matching the provided filters; empty when
    /// nothing matches, never an error for an empty result.
    async fn list(&self, filters: &BookFilters) -> AppResult<Vec<Book>>;

    /// Overwrite all fields of the row matching `book.id`. Zero matched
    /// rows is not an error at this layer.
    async fn update(&self, book: &Book) -> AppResult<()>;

    /// Remove the row matching `id`, failing with a not-found error when
    /// no row matched.
    async fn delete(&self, id: &str) -> AppResult<()>;
}
