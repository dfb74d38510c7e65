//! SQLite books repository

use async_trait::async_trait;
use sqlx::{Pool, Sqlite};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookFilters},
    repository::BookStore,
};

/// [`BookStore`] implementation backed by a SQLite connection pool.
#[derive(Clone)]
pub struct SqliteBookRepository {
    pool: Pool<Sqlite>,
}

impl SqliteBookRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for SqliteBookRepository {
    async fn create(&self, mut book: Book) -> AppResult<Book> {
        if book.id.is_empty() {
            book.id = Uuid::new_v4().to_string();
        }

        sqlx::query(
            r#"
            INSERT INTO books (id, title, author, genre, published_year, status)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&book.id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.genre)
        .bind(book.published_year)
        .bind(book.status)
        .execute(&self.pool)
        .await?;

        Ok(book)
    }

    async fn list(&self, filters: &BookFilters) -> AppResult<Vec<Book>> {
        let mut conditions = Vec::new();

        if filters.id.is_some() {
            conditions.push("id = ?");
        }
        if filters.title.is_some() {
            conditions.push("title = ?");
        }
        if filters.author.is_some() {
            conditions.push("author = ?");
        }
        if filters.genre.is_some() {
            conditions.push("genre = ?");
        }
        if filters.published_year.is_some() {
            conditions.push("published_year = ?");
        }
        if filters.status.is_some() {
            conditions.push("status = ?");
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT id, title, author, genre, published_year, status FROM books {} ORDER BY title, id",
            where_clause
        );

        // Bind order must match the condition order above
        let mut builder = sqlx::query_as::<_, Book>(&query);
        if let Some(ref id) = filters.id {
            builder = builder.bind(id);
        }
        if let Some(ref title) = filters.title {
            builder = builder.bind(title);
        }
        if let Some(ref author) = filters.author {
            builder = builder.bind(author);
        }
        if let Some(ref genre) = filters.genre {
            builder = builder.bind(genre);
        }
        if let Some(year) = filters.published_year {
            builder = builder.bind(year);
        }
        if let Some(status) = filters.status {
            builder = builder.bind(status);
        }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn update(&self, book: &Book) -> AppResult<()> {
        if book.id.is_empty() {
            return Err(AppError::Validation("book id cannot be empty".to_string()));
        }

        sqlx::query(
            r#"
            UPDATE books
            SET title = ?, author = ?, genre = ?, published_year = ?, status = ?
            WHERE id = ?
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.genre)
        .bind(book.published_year)
        .bind(book.status)
        .bind(&book.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("book {} not found", id)));
        }

        Ok(())
    }
}
