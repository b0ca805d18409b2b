//! User and session queries for the Filmbase server.

use filmbase_core::db::unix_timestamp;

use super::db::FilmDatabase;
use super::models::{SessionRecord, User};
use crate::auth::Role;
use filmbase_core::db::DatabaseError;

impl FilmDatabase {
    // =========================================================================
    // User queries
    // =========================================================================

    /// Create a new user. A duplicate username or email yields
    /// [`DatabaseError::Conflict`].
    pub async fn create_user(
        &self,
        id: &str,
        username: &str,
        email: Option<&str>,
        password_hash: &str,
        role: Role,
    ) -> Result<User, DatabaseError> {
        let now = unix_timestamp();

        sqlx::query(
            "INSERT INTO users (id, username, email, password_hash, role, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(role.as_str())
        .bind(now)
        .execute(self.pool())
        .await?;

        self.get_user(id).await
    }

    /// Get a user by ID.
    pub async fn get_user(&self, id: &str) -> Result<User, DatabaseError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("User {id}")))
    }

    /// Get a user by username.
    pub async fn get_user_by_username(&self, username: &str) -> Result<User, DatabaseError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("User with username {username}")))
    }

    // =========================================================================
    // Session queries
    // =========================================================================

    /// Store a new login session for `user`.
    pub async fn create_session(
        &self,
        id: &str,
        token_hash: &str,
        user: &User,
        expires_at: i64,
    ) -> Result<SessionRecord, DatabaseError> {
        let now = unix_timestamp();

        sqlx::query(
            "INSERT INTO sessions (id, token_hash, user_id, username, role, created_at, expires_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(token_hash)
        .bind(&user.id)
        .bind(&user.username)
        .bind(user.role.as_str())
        .bind(now)
        .bind(expires_at)
        .execute(self.pool())
        .await?;

        sqlx::query_as::<_, SessionRecord>("SELECT * FROM sessions WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Session {id}")))
    }

    /// Find a live (non-expired) session by token hash.
    pub async fn get_session_by_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<SessionRecord>, DatabaseError> {
        let now = unix_timestamp();

        let session = sqlx::query_as::<_, SessionRecord>(
            "SELECT * FROM sessions WHERE token_hash = ? AND expires_at > ?",
        )
        .bind(token_hash)
        .bind(now)
        .fetch_optional(self.pool())
        .await?;

        Ok(session)
    }

    /// Delete a session by token hash. Returns whether a row was removed.
    pub async fn delete_session_by_hash(&self, token_hash: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
            .bind(token_hash)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete every session that expired at or before now.
    pub async fn delete_expired_sessions(&self) -> Result<u64, DatabaseError> {
        let now = unix_timestamp();

        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(now)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected())
    }
}
