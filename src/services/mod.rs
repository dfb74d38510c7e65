//! Business logic services

pub mod books;

use std::sync::Arc;

use crate::repository::BookStore;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub books: books::BooksService,
}

impl Services {
    /// Create all services with the given book store
    pub fn new(repository: Arc<dyn BookStore>) -> Self {
        Self {
            books: books::BooksService::new(repository),
        }
    }
}
