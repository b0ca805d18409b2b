//! Credential store: user records keyed by username.

use tracing::info;

use super::error::AuthError;
use super::password;
use super::role::Role;
use crate::storage::{FilmDatabase, User};

/// Input for [`CredentialStore::register`]. `password` is plaintext and is
/// hashed before it reaches the database.
#[derive(Debug, Clone)]
pub struct Registration<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub email: Option<&'a str>,
    pub role: Role,
}

/// Persistent user identities. Only argon2id digests are stored.
#[derive(Clone)]
pub struct CredentialStore {
    db: FilmDatabase,
}

impl CredentialStore {
    pub const fn new(db: FilmDatabase) -> Self {
        Self { db }
    }

    pub async fn find_by_username(&self, username: &str) -> Result<User, AuthError> {
        Ok(self.db.get_user_by_username(username).await?)
    }

    /// Insert a user with an already-computed hash. Uniqueness of username
    /// and email is enforced by the database, so concurrent creates of the
    /// same name resolve to exactly one success and [`AuthError::Conflict`]
    /// for the rest.
    pub async fn create(
        &self,
        username: &str,
        password_hash: &str,
        email: Option<&str>,
        role: Role,
    ) -> Result<User, AuthError> {
        let id = uuid::Uuid::new_v4().to_string();
        match self
            .db
            .create_user(&id, username, email, password_hash, role)
            .await
        {
            Ok(user) => Ok(user),
            Err(e) => match AuthError::from(e) {
                AuthError::Conflict(_) => Err(AuthError::Conflict(
                    "Username or email already registered".to_string(),
                )),
                other => Err(other),
            },
        }
    }

    /// Validate input, hash the password, and create the user.
    pub async fn register(&self, reg: Registration<'_>) -> Result<User, AuthError> {
        let username = reg.username.trim();
        if username.is_empty() {
            return Err(AuthError::Validation("Username must not be empty".into()));
        }
        if reg.password.is_empty() {
            return Err(AuthError::Validation("Password must not be empty".into()));
        }
        let email = reg.email.map(str::trim).filter(|e| !e.is_empty());

        let hash = password::hash(reg.password)?;
        let user = self.create(username, &hash, email, reg.role).await?;

        info!(user_id = %user.id, username = %user.username, role = %user.role, "User registered");
        Ok(user)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn store() -> CredentialStore {
        CredentialStore::new(FilmDatabase::open_in_memory().await.unwrap())
    }

    fn alice() -> Registration<'static> {
        Registration {
            username: "alice",
            password: "wonderland",
            email: Some("alice@example.com"),
            role: Role::Client,
        }
    }

    #[tokio::test]
    async fn register_stores_hash_not_plaintext() {
        let store = store().await;
        let user = store.register(alice()).await.unwrap();

        assert_eq!(user.role, Role::Client);
        assert_ne!(user.password_hash, "wonderland");
        assert!(password::verify("wonderland", &user.password_hash).unwrap());
    }

    #[tokio::test]
    async fn second_registration_of_username_conflicts() {
        let store = store().await;
        store.register(alice()).await.unwrap();

        let again = Registration {
            password: "different",
            email: None,
            role: Role::Admin,
            ..alice()
        };
        assert!(matches!(
            store.register(again).await,
            Err(AuthError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn blank_email_is_treated_as_absent() {
        let store = store().await;
        let user = store
            .register(Registration {
                email: Some("  "),
                ..alice()
            })
            .await
            .unwrap();
        assert_eq!(user.email, None);
    }

    #[tokio::test]
    async fn empty_fields_rejected() {
        let store = store().await;
        let no_name = Registration {
            username: " ",
            ..alice()
        };
        assert!(matches!(
            store.register(no_name).await,
            Err(AuthError::Validation(_))
        ));
        let no_pw = Registration {
            password: "",
            ..alice()
        };
        assert!(matches!(
            store.register(no_pw).await,
            Err(AuthError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn find_unknown_user_is_not_found() {
        let store = store().await;
        assert!(matches!(
            store.find_by_username("ghost").await,
            Err(AuthError::NotFound(_))
        ));
    }
}
