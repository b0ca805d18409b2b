//! Session authority: issues, validates and invalidates login sessions.
//!
//! The browser holds a random 256-bit token; the server keeps only its
//! SHA-256 digest together with the bound user id and role. Nothing the
//! client can read or modify determines identity or role.

use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::{debug, info, warn};

use filmbase_core::db::unix_timestamp;

use super::credentials::CredentialStore;
use super::error::AuthError;
use super::password;
use super::role::Role;
use crate::storage::FilmDatabase;

/// Raw token length in bytes (hex-encoded on the wire).
pub const TOKEN_BYTES: usize = 32;

/// A live, authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub username: String,
    pub role: Role,
    pub expires_at: i64,
}

/// Result of resolving a presented token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated(Session),
}

/// A freshly issued session plus the token to hand to the client.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub session: Session,
}

pub struct SessionAuthority {
    db: FilmDatabase,
    credentials: CredentialStore,
    ttl_secs: i64,
    /// Hash verified against when the username is unknown, so that both
    /// failure paths cost one argon2 verification.
    dummy_hash: String,
}

impl SessionAuthority {
    pub fn new(db: FilmDatabase, ttl_secs: i64) -> Result<Self, AuthError> {
        let dummy_hash = password::decoy()?;
        Ok(Self {
            credentials: CredentialStore::new(db.clone()),
            db,
            ttl_secs,
            dummy_hash,
        })
    }

    pub const fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Verify `username`/`password` and open a new session.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<IssuedSession, AuthError> {
        self.authenticate_replacing(username, password, None).await
    }

    /// Like [`authenticate`](Self::authenticate), but once the credentials
    /// check out the session behind `previous` is ended before the new one
    /// is stored. A failed login leaves `previous` untouched.
    pub async fn authenticate_replacing(
        &self,
        username: &str,
        password: &str,
        previous: Option<&str>,
    ) -> Result<IssuedSession, AuthError> {
        let user = match self.credentials.find_by_username(username).await {
            Ok(user) => Some(user),
            Err(AuthError::NotFound(_)) => None,
            Err(e) => return Err(e),
        };

        let stored_hash = user.as_ref().map_or(self.dummy_hash.as_str(), |u| {
            u.password_hash.as_str()
        });
        let valid = password::verify(password, stored_hash)?;

        let user = match user {
            Some(user) if valid => user,
            _ => {
                warn!(username = %username, "Failed login attempt");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if let Some(previous) = previous {
            self.invalidate(previous).await?;
        }

        let token = generate_token();
        let expires_at = unix_timestamp() + self.ttl_secs;
        let session_id = uuid::Uuid::new_v4().to_string();
        let record = self
            .db
            .create_session(&session_id, &hash_token(&token), &user, expires_at)
            .await?;

        info!(user_id = %user.id, username = %user.username, role = %user.role, "User logged in");

        Ok(IssuedSession {
            token,
            session: Session {
                user_id: record.user_id,
                username: record.username,
                role: record.role,
                expires_at: record.expires_at,
            },
        })
    }

    /// Resolve a presented token. Unknown, malformed, expired and
    /// invalidated tokens all come back as [`SessionState::Anonymous`].
    pub async fn validate(&self, token: &str) -> Result<SessionState, AuthError> {
        if !is_well_formed(token) {
            return Ok(SessionState::Anonymous);
        }

        let token_hash = hash_token(token);
        let Some(record) = self.db.get_session_by_hash(&token_hash).await? else {
            debug!("Session token not recognised");
            return Ok(SessionState::Anonymous);
        };

        if !bool::from(record.token_hash.as_bytes().ct_eq(token_hash.as_bytes())) {
            return Ok(SessionState::Anonymous);
        }

        Ok(SessionState::Authenticated(Session {
            user_id: record.user_id,
            username: record.username,
            role: record.role,
            expires_at: record.expires_at,
        }))
    }

    /// End a session. Invalidating an unknown or already-ended token is not
    /// an error.
    pub async fn invalidate(&self, token: &str) -> Result<(), AuthError> {
        if !is_well_formed(token) {
            return Ok(());
        }
        if self.db.delete_session_by_hash(&hash_token(token)).await? {
            info!("Session invalidated");
        }
        Ok(())
    }

    /// Drop expired sessions from the store.
    pub async fn purge_expired(&self) -> Result<u64, AuthError> {
        Ok(self.db.delete_expired_sessions().await?)
    }
}

/// Generate a new hex-encoded session token from the OS CSPRNG.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Hash a token for storage (raw tokens are never stored).
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn is_well_formed(token: &str) -> bool {
    token.len() == TOKEN_BYTES * 2 && token.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::auth::credentials::Registration;

    async fn setup(ttl_secs: i64) -> SessionAuthority {
        let db = FilmDatabase::open_in_memory().await.unwrap();
        let authority = SessionAuthority::new(db.clone(), ttl_secs).unwrap();
        CredentialStore::new(db)
            .register(Registration {
                username: "alice",
                password: "wonderland",
                email: None,
                role: Role::Client,
            })
            .await
            .unwrap();
        authority
    }

    #[tokio::test]
    async fn authenticate_yields_registered_role() {
        let authority = setup(3600).await;
        let issued = authority.authenticate("alice", "wonderland").await.unwrap();

        assert_eq!(issued.session.username, "alice");
        assert_eq!(issued.session.role, Role::Client);
        assert_eq!(issued.token.len(), TOKEN_BYTES * 2);

        let state = authority.validate(&issued.token).await.unwrap();
        assert_eq!(state, SessionState::Authenticated(issued.session));
    }

    #[tokio::test]
    async fn each_login_issues_a_distinct_token() {
        let authority = setup(3600).await;
        let a = authority.authenticate("alice", "wonderland").await.unwrap();
        let b = authority.authenticate("alice", "wonderland").await.unwrap();
        assert_ne!(a.token, b.token);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_look_identical() {
        let authority = setup(3600).await;
        let wrong = authority.authenticate("alice", "queen").await.unwrap_err();
        let ghost = authority.authenticate("ghost", "queen").await.unwrap_err();
        assert!(matches!(wrong, AuthError::InvalidCredentials));
        assert!(matches!(ghost, AuthError::InvalidCredentials));
        assert_eq!(wrong.to_string(), ghost.to_string());
    }

    #[tokio::test]
    async fn relogin_ends_previous_session_only_on_success() {
        let authority = setup(3600).await;
        let first = authority.authenticate("alice", "wonderland").await.unwrap();

        let err = authority
            .authenticate_replacing("alice", "queen", Some(first.token.as_str()))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert!(matches!(
            authority.validate(&first.token).await.unwrap(),
            SessionState::Authenticated(_)
        ));

        let second = authority
            .authenticate_replacing("alice", "wonderland", Some(first.token.as_str()))
            .await
            .unwrap();
        assert_eq!(
            authority.validate(&first.token).await.unwrap(),
            SessionState::Anonymous
        );
        assert_eq!(
            authority.validate(&second.token).await.unwrap(),
            SessionState::Authenticated(second.session)
        );
    }

    #[tokio::test]
    async fn invalidate_is_idempotent() {
        let authority = setup(3600).await;
        let issued = authority.authenticate("alice", "wonderland").await.unwrap();

        authority.invalidate(&issued.token).await.unwrap();
        authority.invalidate(&issued.token).await.unwrap();
        assert_eq!(
            authority.validate(&issued.token).await.unwrap(),
            SessionState::Anonymous
        );
    }

    #[tokio::test]
    async fn expired_session_is_anonymous() {
        let authority = setup(-1).await;
        let issued = authority.authenticate("alice", "wonderland").await.unwrap();

        assert_eq!(
            authority.validate(&issued.token).await.unwrap(),
            SessionState::Anonymous
        );
        assert_eq!(authority.purge_expired().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn garbage_tokens_are_anonymous() {
        let authority = setup(3600).await;
        let not_hex = "z".repeat(64);
        let never_issued = generate_token();
        for token in ["", "abc", not_hex.as_str(), never_issued.as_str()] {
            assert_eq!(
                authority.validate(token).await.unwrap(),
                SessionState::Anonymous
            );
            authority.invalidate(token).await.unwrap();
        }
    }

    #[test]
    fn token_hash_is_deterministic() {
        let h1 = hash_token("same-token");
        let h2 = hash_token("same-token");
        assert_eq!(h1, h2);
        assert_ne!(h1, hash_token("different-token"));
    }
}
