//! Data models for Filmbase storage.

use serde::{Deserialize, Serialize};

use crate::auth::Role;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: i64,
}

/// Server-side login session. Only the SHA-256 of the cookie token is kept.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SessionRecord {
    pub id: String,
    pub token_hash: String,
    pub user_id: String,
    pub username: String,
    pub role: Role,
    pub created_at: i64,
    pub expires_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub director: Option<String>,
    pub release_year: Option<i64>,
    pub genre: Option<String>,
    pub rating: Option<f64>,
    pub created_at: i64,
}

/// Fields for a new movie, as posted by the browser client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewMovie {
    pub title: String,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default, rename = "releaseYear", alias = "release_year")]
    pub release_year: Option<i64>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
}

/// Partial update. Absent or `null` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MoviePatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default, rename = "releaseYear", alias = "release_year")]
    pub release_year: Option<i64>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
}

/// Outcome of applying a [`MoviePatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum MovieUpdate {
    Updated(Movie),
    Unchanged(Movie),
}

pub const MIN_RELEASE_YEAR: i64 = 1800;
pub const MAX_RELEASE_YEAR: i64 = 3000;
pub const MAX_RATING: f64 = 10.0;

impl NewMovie {
    /// Check field bounds. Returns a human-readable reason on failure.
    pub fn validate(&self) -> Result<(), String> {
        check_title(&self.title)?;
        check_release_year(self.release_year)?;
        check_rating(self.rating)
    }
}

impl MoviePatch {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(title) = &self.title {
            check_title(title)?;
        }
        check_release_year(self.release_year)?;
        check_rating(self.rating)
    }

    /// Apply the patch on top of `movie`, returning the resulting record.
    pub fn apply(&self, movie: &Movie) -> Movie {
        Movie {
            id: movie.id.clone(),
            title: self
                .title
                .as_deref()
                .map_or_else(|| movie.title.clone(), |t| t.trim().to_string()),
            director: self.director.clone().or_else(|| movie.director.clone()),
            release_year: self.release_year.or(movie.release_year),
            genre: self.genre.clone().or_else(|| movie.genre.clone()),
            rating: self.rating.or(movie.rating),
            created_at: movie.created_at,
        }
    }
}

fn check_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("Title must not be empty".to_string());
    }
    Ok(())
}

fn check_release_year(year: Option<i64>) -> Result<(), String> {
    match year {
        Some(y) if !(MIN_RELEASE_YEAR..=MAX_RELEASE_YEAR).contains(&y) => Err(format!(
            "Release year must be between {MIN_RELEASE_YEAR} and {MAX_RELEASE_YEAR}"
        )),
        _ => Ok(()),
    }
}

fn check_rating(rating: Option<f64>) -> Result<(), String> {
    match rating {
        Some(r) if !r.is_finite() || !(0.0..=MAX_RATING).contains(&r) => {
            Err(format!("Rating must be between 0 and {MAX_RATING}"))
        }
        _ => Ok(()),
    }
}
