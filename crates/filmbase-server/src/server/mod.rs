//! HTTP server for Filmbase: router, shared state, and handlers.

pub mod auth_svc;
pub mod cookie;
pub mod error;
pub mod extract;
pub mod health;
pub mod interceptor;
pub mod movie_svc;
pub mod pages;

#[cfg(test)]
mod auth_svc_tests;

use std::sync::Arc;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post, put};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{CredentialStore, Policy, SessionAuthority};
use crate::storage::FilmDatabase;

pub use cookie::CookieSettings;
pub use error::ApiError;
pub use interceptor::GuardState;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: FilmDatabase,
    pub credentials: CredentialStore,
    pub sessions: Arc<SessionAuthority>,
    pub cookies: CookieSettings,
}

impl AppState {
    pub fn new(db: FilmDatabase, sessions: Arc<SessionAuthority>, secure_cookie: bool) -> Self {
        let cookies = CookieSettings {
            secure: secure_cookie,
            max_age_secs: sessions.ttl_secs(),
        };
        Self {
            credentials: CredentialStore::new(db.clone()),
            db,
            sessions,
            cookies,
        }
    }
}

/// Build the application router. Each protected route gets its own guard
/// layer carrying that route's [`Policy`].
pub fn build_router(state: AppState) -> Router {
    let sessions = Arc::clone(&state.sessions);
    let require = move |policy: Policy| {
        from_fn_with_state(
            GuardState::new(Arc::clone(&sessions), policy),
            interceptor::enforce,
        )
    };

    Router::new()
        .route("/health", get(health::health))
        .route("/login", get(pages::login_page))
        .route("/register", get(pages::register_page))
        .route("/logout", get(auth_svc::logout))
        .route("/", get(pages::index).route_layer(require(Policy::page())))
        .route(
            "/add_movie",
            get(pages::add_movie_page).route_layer(require(Policy::page_admin())),
        )
        .route("/api/login", post(auth_svc::login))
        .route("/api/register", post(auth_svc::register))
        .route(
            "/api/user-info",
            get(auth_svc::user_info).route_layer(require(Policy::api())),
        )
        .route(
            "/api/movies",
            get(movie_svc::list_movies)
                .route_layer(require(Policy::api()))
                .merge(post(movie_svc::create_movie).route_layer(require(Policy::api_admin()))),
        )
        .route(
            "/api/movies/{id}",
            get(movie_svc::get_movie)
                .route_layer(require(Policy::api()))
                .merge(
                    put(movie_svc::update_movie)
                        .merge(delete(movie_svc::delete_movie))
                        .route_layer(require(Policy::api_admin())),
                ),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
