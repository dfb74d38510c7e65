//! Data models for the book club catalog

pub mod book;

pub use book::{Book, BookFilters, BookStatus};
