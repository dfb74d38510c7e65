//! Book model and request payloads

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, AppResult};

/// Lifecycle status of a book in the reading club.
///
/// Lifecycle: SAVED (optional), SUGGESTED, then DISCARDED or READING,
/// then COMPLETED. COMPLETED and DISCARDED are reachable only through
/// updates, never at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum BookStatus {
    /// Possible new candidate for reading
    Saved,
    /// Being considered for reading
    Suggested,
    /// Accepted and currently being read
    Reading,
    /// Not approved for reading
    Discarded,
    /// Has been read
    Completed,
}

impl BookStatus {
    /// Parse the uppercase wire representation, rejecting anything
    /// outside the closed enumeration.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SAVED" => Some(BookStatus::Saved),
            "SUGGESTED" => Some(BookStatus::Suggested),
            "READING" => Some(BookStatus::Reading),
            "DISCARDED" => Some(BookStatus::Discarded),
            "COMPLETED" => Some(BookStatus::Completed),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BookStatus::Saved => "SAVED",
            BookStatus::Suggested => "SUGGESTED",
            BookStatus::Reading => "READING",
            BookStatus::Discarded => "DISCARDED",
            BookStatus::Completed => "COMPLETED",
        }
    }
}

impl std::fmt::Display for BookStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Book record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub genre: Option<String>,
    #[serde(rename = "year")]
    pub published_year: Option<i32>,
    pub status: BookStatus,
}

/// Optional exact-match filters for listing books; also the query
/// parameters of `GET /v1/books`.
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookFilters {
    pub id: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    #[serde(rename = "year")]
    pub published_year: Option<i32>,
    pub status: Option<BookStatus>,
}

/// Create book request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBookRequest {
    pub title: String,
    pub author: String,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub status: String,
}

impl CreateBookRequest {
    /// Check every field and return the parsed status on success.
    pub fn validate(&self) -> AppResult<BookStatus> {
        if self.title.is_empty() {
            return Err(AppError::Validation("title cannot be empty".to_string()));
        }
        if self.author.is_empty() {
            return Err(AppError::Validation("author cannot be empty".to_string()));
        }
        if let Some(ref genre) = self.genre {
            if genre.is_empty() {
                return Err(AppError::Validation("genre cannot be empty".to_string()));
            }
        }
        if let Some(year) = self.year {
            validate_year(year)?;
        }
        BookStatus::parse(&self.status)
            .ok_or_else(|| AppError::Validation(format!("unknown book status {}", self.status)))
    }
}

/// Update book request; every field independently optional so absent
/// attributes keep their stored value.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub status: Option<String>,
}

impl UpdateBookRequest {
    /// Check every provided field and return the parsed status when one
    /// was supplied.
    pub fn validate(&self) -> AppResult<Option<BookStatus>> {
        if matches!(self.title.as_deref(), Some("")) {
            return Err(AppError::Validation("title cannot be empty".to_string()));
        }
        if matches!(self.author.as_deref(), Some("")) {
            return Err(AppError::Validation("author cannot be empty".to_string()));
        }
        if matches!(self.genre.as_deref(), Some("")) {
            return Err(AppError::Validation("genre cannot be empty".to_string()));
        }
        if let Some(year) = self.year {
            validate_year(year)?;
        }
        match self.status {
            Some(ref s) => BookStatus::parse(s)
                .map(Some)
                .ok_or_else(|| AppError::Validation(format!("unknown book status {}", s))),
            None => Ok(None),
        }
    }
}

fn validate_year(year: i32) -> AppResult<()> {
    let current = Utc::now().year();
    if year > current {
        return Err(AppError::Validation(format!(
            "year {} is later than the current year {}",
            year, current
        )));
    }
    Ok(())
}
