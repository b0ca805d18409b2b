//! Filmbase Server Library
//!
//! Core functionality for the Filmbase movie catalog:
//! - SQLite storage for users, sessions, and movies
//! - Password hashing, session tokens, and role-based access checks
//! - HTTP API and page routes (axum)

pub mod auth;
pub mod server;
pub mod storage;
