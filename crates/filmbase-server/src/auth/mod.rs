//! Authentication and authorization for the Filmbase server.
//!
//! - [`CredentialStore`]: user records with argon2id password hashes
//! - [`SessionAuthority`]: opaque, server-tracked login sessions
//! - [`guard`]: the per-request role policy

pub mod credentials;
pub mod error;
pub mod guard;
pub mod password;
pub mod role;
pub mod session;

pub use credentials::CredentialStore;
pub use error::AuthError;
pub use guard::{Decision, EndpointClass, Identity, Policy, guard};
pub use role::Role;
pub use session::{IssuedSession, Session, SessionAuthority, SessionState};
