//! `SQLite` storage for the Filmbase server.
//!
//! Provides persistence for users, login sessions, and movies.

mod db;
mod models;
mod queries;
mod queries_movies;


pub use db::FilmDatabase;
pub use filmbase_core::db::DatabaseError;
pub use models::*;
