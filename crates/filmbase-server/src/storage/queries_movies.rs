//! Movie queries for the Filmbase server.

use filmbase_core::db::{DatabaseError, unix_timestamp};

use super::db::FilmDatabase;
use super::models::{Movie, MoviePatch, MovieUpdate, NewMovie};

impl FilmDatabase {
    /// List all movies, newest first.
    pub async fn list_movies(&self) -> Result<Vec<Movie>, DatabaseError> {
        let movies = sqlx::query_as::<_, Movie>(
            "SELECT * FROM movies ORDER BY created_at DESC, rowid DESC",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(movies)
    }

    /// Get a movie by ID.
    pub async fn get_movie(&self, id: &str) -> Result<Movie, DatabaseError> {
        sqlx::query_as::<_, Movie>("SELECT * FROM movies WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Movie {id}")))
    }

    /// Insert a movie. Callers validate `movie` first; the table's CHECK
    /// constraints reject anything that slips through.
    pub async fn create_movie(&self, id: &str, movie: &NewMovie) -> Result<Movie, DatabaseError> {
        let now = unix_timestamp();

        sqlx::query(
            "INSERT INTO movies (id, title, director, release_year, genre, rating, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(movie.title.trim())
        .bind(&movie.director)
        .bind(movie.release_year)
        .bind(&movie.genre)
        .bind(movie.rating)
        .bind(now)
        .execute(self.pool())
        .await?;

        self.get_movie(id).await
    }

    /// Apply a partial update inside a transaction.
    pub async fn update_movie(
        &self,
        id: &str,
        patch: &MoviePatch,
    ) -> Result<MovieUpdate, DatabaseError> {
        let mut tx = self.pool().begin().await?;

        let current = sqlx::query_as::<_, Movie>("SELECT * FROM movies WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Movie {id}")))?;

        let updated = patch.apply(&current);
        if updated == current {
            tx.rollback().await?;
            return Ok(MovieUpdate::Unchanged(current));
        }

        sqlx::query(
            "UPDATE movies SET title = ?, director = ?, release_year = ?, genre = ?, rating = ? WHERE id = ?",
        )
        .bind(&updated.title)
        .bind(&updated.director)
        .bind(updated.release_year)
        .bind(&updated.genre)
        .bind(updated.rating)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(MovieUpdate::Updated(updated))
    }

    /// Remove a movie. Returns whether a row was removed.
    pub async fn delete_movie(&self, id: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM movies WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
