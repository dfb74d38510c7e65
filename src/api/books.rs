//! Book endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{CreateBookRequest, UpdateBookRequest},
        Book, BookFilters,
    },
};

/// Create a book
#[utoipa::path(
    put,
    path = "/books",
    tag = "books",
    request_body = CreateBookRequest,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid book payload")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    Json(data): Json<CreateBookRequest>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let status = data.validate()?;

    let book = state
        .services
        .books
        .create_book(Book {
            id: Uuid::new_v4().to_string(),
            title: data.title,
            author: data.author,
            genre: data.genre,
            published_year: data.year,
            status,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(book)))
}

/// List books with optional exact-match filters
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookFilters),
    responses(
        (status = 200, description = "Books matching the filters", body = Vec<Book>)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(filters): Query<BookFilters>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.books.read_books(&filters).await?;
    Ok(Json(books))
}

/// Update a book; absent fields keep their stored value
#[utoipa::path(
    patch,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    request_body = UpdateBookRequest,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid book payload"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    Json(data): Json<UpdateBookRequest>,
) -> AppResult<Json<Book>> {
    let status = data.validate()?;

    // Merge the patch over the stored row so untouched fields survive the
    // full-overwrite update
    let filters = BookFilters {
        id: Some(id.clone()),
        ..Default::default()
    };
    let mut book = state
        .services
        .books
        .read_books(&filters)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound(format!("book {} not found", id)))?;

    if let Some(title) = data.title {
        book.title = title;
    }
    if let Some(author) = data.author {
        book.author = author;
    }
    if let Some(genre) = data.genre {
        book.genre = Some(genre);
    }
    if let Some(year) = data.year {
        book.published_year = Some(year);
    }
    if let Some(status) = status {
        book.status = status;
    }

    let book = state.services.books.update_book(book).await?;
    Ok(Json(book))
}

/// Delete a book by ID
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.services.books.delete_book(&id).await?;
    tracing::info!(id = %id, "book deleted");
    Ok(StatusCode::NO_CONTENT)
}
