//! API handlers for the book club REST endpoints

pub mod books;
pub mod health;
pub mod openapi;
