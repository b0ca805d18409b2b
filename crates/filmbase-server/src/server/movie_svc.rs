//! Movie catalog endpoints. Every route here sits behind the guard layer;
//! handlers receive the admitted [`Identity`] for audit logging.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Serialize;
use tracing::{info, instrument};

use super::AppState;
use super::error::ApiError;
use super::extract::JsonBody;
use crate::auth::Identity;
use crate::storage::{Movie, MoviePatch, MovieUpdate, NewMovie};

#[derive(Debug, Serialize)]
pub struct MovieList {
    pub movies: Vec<Movie>,
}

#[derive(Debug, Serialize)]
pub struct MovieCreated {
    pub message: &'static str,
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct MovieMessage {
    pub message: &'static str,
}

/// `GET /api/movies` — newest first.
pub async fn list_movies(State(state): State<AppState>) -> Result<Json<MovieList>, ApiError> {
    let movies = state.db.list_movies().await?;
    Ok(Json(MovieList { movies }))
}

/// `GET /api/movies/{id}`
pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Movie>, ApiError> {
    let movie = state.db.get_movie(&id).await?;
    Ok(Json(movie))
}

/// `POST /api/movies` (admin)
#[instrument(skip_all, fields(user_id = %identity.user_id))]
pub async fn create_movie(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    JsonBody(movie): JsonBody<NewMovie>,
) -> Result<Json<MovieCreated>, ApiError> {
    movie.validate().map_err(ApiError::Validation)?;

    let id = uuid::Uuid::new_v4().to_string();
    let created = state.db.create_movie(&id, &movie).await?;

    info!(movie_id = %created.id, title = %created.title, "Movie added");
    Ok(Json(MovieCreated {
        message: "Movie added successfully",
        id: created.id,
    }))
}

/// `PUT /api/movies/{id}` (admin) — partial update.
#[instrument(skip_all, fields(user_id = %identity.user_id, movie_id = %id))]
pub async fn update_movie(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<MoviePatch>,
) -> Result<Json<MovieMessage>, ApiError> {
    patch.validate().map_err(ApiError::Validation)?;

    let message = match state.db.update_movie(&id, &patch).await? {
        MovieUpdate::Updated(_) => {
            info!("Movie updated");
            "Movie updated successfully"
        }
        MovieUpdate::Unchanged(_) => "No changes made to the movie",
    };
    Ok(Json(MovieMessage { message }))
}

/// `DELETE /api/movies/{id}` (admin)
#[instrument(skip_all, fields(user_id = %identity.user_id, movie_id = %id))]
pub async fn delete_movie(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<Json<MovieMessage>, ApiError> {
    if !state.db.delete_movie(&id).await? {
        return Err(ApiError::NotFound(format!("Movie {id} not found")));
    }

    info!("Movie deleted");
    Ok(Json(MovieMessage {
        message: "Movie deleted successfully",
    }))
}
