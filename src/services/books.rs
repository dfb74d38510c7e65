//! Books service
//!
//! The sole place where cross-cutting business rules live, independent of
//! transport and storage concerns. Each operation is a single pass-through
//! with at most one validation gate; nothing is retried.

use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookFilters, BookStatus},
    repository::BookStore,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Arc<dyn BookStore>,
}

impl BooksService {
    pub fn new(repository: Arc<dyn BookStore>) -> Self {
        Self { repository }
    }

    /// Create a book. COMPLETED and DISCARDED are terminal states, only
    /// reachable through later updates, and are rejected here.
    pub async fn create_book(&self, book: Book) -> AppResult<Book> {
        if matches!(book.status, BookStatus::Completed | BookStatus::Discarded) {
            return Err(AppError::Validation(format!(
                "cannot create book with status {}",
                book.status
            )));
        }
        self.repository.create(book).await
    }

    /// Retrieve books matching the filters. Pass-through today; the place
    /// where visibility rules would land.
    pub async fn read_books(&self, filters: &BookFilters) -> AppResult<Vec<Book>> {
        self.repository.list(filters).await
    }

    /// Update a book and return the input as the result; the stored row
    /// is not re-fetched.
    pub async fn update_book(&self, book: Book) -> AppResult<Book> {
        self.repository.update(&book).await?;
        Ok(book)
    }

    /// Delete a book by id, propagating the store's not-found condition
    /// distinctly from other failures.
    pub async fn delete_book(&self, id: &str) -> AppResult<()> {
        self.repository.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockBookStore;

    fn book(status: BookStatus) -> Book {
        Book {
            id: "b-1".to_string(),
            title: "Dune".to_string(),
            author: "Herbert".to_string(),
            genre: None,
            published_year: Some(1965),
            status,
        }
    }

    #[tokio::test]
    async fn create_delegates_for_creatable_statuses() {
        for status in [BookStatus::Saved, BookStatus::Suggested, BookStatus::Reading] {
            let mut store = MockBookStore::new();
            store
                .expect_create()
                .withf(move |b| b.status == status)
                .times(1)
                .returning(Ok);

            let service = BooksService::new(Arc::new(store));
            let created = service.create_book(book(status)).await.unwrap();
            assert_eq!(created.status, status);
        }
    }

    #[tokio::test]
    async fn create_rejects_terminal_statuses_without_touching_the_store() {
        for status in [BookStatus::Completed, BookStatus::Discarded] {
            // No expectations set: any repository call would panic
            let store = MockBookStore::new();
            let service = BooksService::new(Arc::new(store));

            let err = service.create_book(book(status)).await.unwrap_err();
            assert!(
                matches!(err, AppError::Validation(ref msg) if msg.contains(status.as_str()))
            );
        }
    }

    #[tokio::test]
    async fn read_books_passes_filters_through() {
        let mut store = MockBookStore::new();
        store
            .expect_list()
            .withf(|f| f.author.as_deref() == Some("Herbert"))
            .times(1)
            .returning(|_| Ok(vec![]));

        let service = BooksService::new(Arc::new(store));
        let filters = BookFilters {
            author: Some("Herbert".to_string()),
            ..Default::default()
        };
        let books = service.read_books(&filters).await.unwrap();
        assert!(books.is_empty());
    }

    #[tokio::test]
    async fn update_returns_the_input_book_on_success() {
        let mut store = MockBookStore::new();
        store.expect_update().times(1).returning(|_| Ok(()));

        let service = BooksService::new(Arc::new(store));
        let input = book(BookStatus::Completed);
        let updated = service.update_book(input.clone()).await.unwrap();
        assert_eq!(updated, input);
    }

    #[tokio::test]
    async fn update_propagates_store_failures() {
        let mut store = MockBookStore::new();
        store
            .expect_update()
            .returning(|_| Err(AppError::Validation("book id cannot be empty".to_string())));

        let service = BooksService::new(Arc::new(store));
        let err = service.update_book(book(BookStatus::Saved)).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn delete_propagates_not_found() {
        let mut store = MockBookStore::new();
        store
            .expect_delete()
            .withf(|id| id == "unknown-id")
            .returning(|id| Err(AppError::NotFound(format!("book {} not found", id))));

        let service = BooksService::new(Arc::new(store));
        let err = service.delete_book("unknown-id").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
